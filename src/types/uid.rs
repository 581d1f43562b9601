// Copyright (c) 2024 Mike Tsao

//! Identifiers for listeners.

use core::sync::atomic::{AtomicUsize, Ordering};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Identifies a beat or rate listener. Two registry entries with the same
/// [ListenerUid] are the same listener as far as removal is concerned.
#[derive(Synonym, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[synonym(skip(Default))]
#[serde(rename_all = "kebab-case")]
pub struct ListenerUid(#[derivative(Default(value = "1"))] pub usize);

/// Hands out [ListenerUid]s, starting at [ListenerUid::default()]. Safe to
/// share across threads.
#[derive(Debug)]
pub struct ListenerUidFactory {
    next: AtomicUsize,
}
impl Default for ListenerUidFactory {
    fn default() -> Self {
        Self {
            next: AtomicUsize::new(ListenerUid::default().0),
        }
    }
}
impl ListenerUidFactory {
    /// Returns a uid this factory has never returned before.
    pub fn mint_next(&self) -> ListenerUid {
        ListenerUid(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
