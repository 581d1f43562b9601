// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use std::sync::{Arc, PoisonError, RwLock};

/// An ordered list of listeners of one kind, keyed by [ListenerUid].
///
/// Registration appends, even if the uid is already present, so a listener
/// registered twice is notified twice. Removal drops every entry with the
/// given uid and keeps everything else.
///
/// Notification works on a snapshot of the list taken when the pass begins,
/// and the list's lock is released before any listener runs. A listener may
/// therefore register or unregister anyone, including itself, from inside its
/// callback. Such changes apply to the next pass, not the current one.
pub struct ListenerRegistry<L: ?Sized> {
    entries: RwLock<Vec<ListenerEntry<L>>>,
}

struct ListenerEntry<L: ?Sized> {
    uid: ListenerUid,
    listener: Arc<RwLock<L>>,
}
impl<L: ?Sized> Clone for ListenerEntry<L> {
    fn clone(&self) -> Self {
        Self {
            uid: self.uid,
            listener: Arc::clone(&self.listener),
        }
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self {
            entries: Default::default(),
        }
    }
}
impl<L: ?Sized> core::fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("uids", &self.uids())
            .finish()
    }
}
impl<L: ?Sized> ListenerRegistry<L> {
    /// Adds a listener to the end of the list.
    pub fn register(&self, uid: ListenerUid, listener: Arc<RwLock<L>>) {
        self.write_entries().push(ListenerEntry { uid, listener });
    }

    /// Removes every entry registered under `uid`. Returns how many were
    /// removed; an unknown uid removes nothing and isn't an error.
    pub fn unregister(&self, uid: ListenerUid) -> usize {
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|e| e.uid != uid);
        before - entries.len()
    }

    /// Whether any entry is registered under `uid`.
    pub fn contains(&self, uid: ListenerUid) -> bool {
        self.read_entries().iter().any(|e| e.uid == uid)
    }

    /// The registered uids, in notification order. Duplicates appear once
    /// per registration.
    pub fn uids(&self) -> Vec<ListenerUid> {
        self.read_entries().iter().map(|e| e.uid).collect()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Calls `f` once for each entry, in registration order, on the calling
    /// thread. Returns the number of listeners that were actually called.
    ///
    /// A listener whose lock was poisoned by an earlier panic is skipped, and
    /// the pass continues with the next one.
    pub fn notify_each(&self, mut f: impl FnMut(&mut L)) -> usize {
        let snapshot: Vec<ListenerEntry<L>> = self.read_entries().clone();
        let mut notified = 0;
        for entry in snapshot {
            match entry.listener.write() {
                Ok(mut listener) => {
                    f(&mut *listener);
                    notified += 1;
                }
                Err(e) => {
                    log::warn!("Skipping listener {}: {e}", entry.uid);
                }
            }
        }
        notified
    }

    // A panic elsewhere can't leave the Vec half-modified, because every
    // mutation here is a single push or retain. So a poisoned lock is safe to
    // keep using.
    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, Vec<ListenerEntry<L>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, Vec<ListenerEntry<L>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Pings: Send + Sync {
        fn ping(&mut self);
    }

    #[derive(Debug, Default)]
    struct Counter {
        pings: usize,
    }
    impl Pings for Counter {
        fn ping(&mut self) {
            self.pings += 1;
        }
    }

    fn counter() -> Arc<RwLock<Counter>> {
        Arc::new(RwLock::new(Counter::default()))
    }

    #[test]
    fn notifies_in_registration_order() {
        let registry = ListenerRegistry::<dyn Pings>::default();
        let order = Arc::new(RwLock::new(Vec::default()));

        struct Recorder(ListenerUid, Arc<RwLock<Vec<ListenerUid>>>);
        impl Pings for Recorder {
            fn ping(&mut self) {
                self.1.write().unwrap().push(self.0);
            }
        }
        for uid in [3, 1, 2] {
            let uid = ListenerUid(uid);
            registry.register(uid, Arc::new(RwLock::new(Recorder(uid, Arc::clone(&order)))));
        }

        assert_eq!(registry.notify_each(|l| l.ping()), 3);
        assert_eq!(
            *order.read().unwrap(),
            vec![ListenerUid(3), ListenerUid(1), ListenerUid(2)]
        );
        assert_eq!(registry.uids(), *order.read().unwrap());
    }

    #[test]
    fn duplicates_are_kept_and_removed_together() {
        let registry = ListenerRegistry::<dyn Pings>::default();
        let c = counter();
        let other = counter();
        registry.register(ListenerUid(1), c.clone());
        registry.register(ListenerUid(1), c.clone());
        registry.register(ListenerUid(2), other.clone());
        assert_eq!(registry.len(), 3);

        registry.notify_each(|l| l.ping());
        assert_eq!(c.read().unwrap().pings, 2, "registered twice, notified twice");
        assert_eq!(other.read().unwrap().pings, 1);

        assert_eq!(registry.unregister(ListenerUid(1)), 2);
        assert!(!registry.contains(ListenerUid(1)));
        assert!(registry.contains(ListenerUid(2)), "non-matching entries survive");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistering_unknown_uid_is_a_no_op() {
        let registry = ListenerRegistry::<dyn Pings>::default();
        assert!(registry.is_empty());
        assert_eq!(registry.unregister(ListenerUid(99)), 0);

        registry.register(ListenerUid(1), counter());
        assert_eq!(registry.unregister(ListenerUid(99)), 0);
        assert_eq!(registry.uids(), vec![ListenerUid(1)]);
    }

    #[test]
    fn poisoned_listener_is_skipped() {
        let registry = ListenerRegistry::<dyn Pings>::default();
        let poisoned = counter();
        let healthy = counter();
        registry.register(ListenerUid(1), poisoned.clone());
        registry.register(ListenerUid(2), healthy.clone());

        let p = Arc::clone(&poisoned);
        let _ = std::thread::spawn(move || {
            let _guard = p.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(poisoned.is_poisoned());

        assert_eq!(registry.notify_each(|l| l.ping()), 1);
        assert_eq!(healthy.read().unwrap().pings, 1);
    }
}
