// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use anyhow::anyhow;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

/// [TempoModel] owns the current rate and whether the pulse generator is
/// running, and tells registered listeners about beats and rate changes.
///
/// Every rate change goes through [TempoModel::set_rate()], so the generator,
/// the stored rate, and what rate listeners last heard always agree.
/// Listeners hear about a change only after it has succeeded.
///
/// All methods take `&self`, and no internal lock is held while listeners
/// run, so a listener may query the model or change its own registration
/// from inside a callback.
#[derive(Debug)]
pub struct TempoModel {
    generator: Mutex<Box<dyn PulseGenerator>>,
    settings: TempoSettings,

    beat_listeners: ListenerRegistry<dyn ObservesBeat>,
    rate_listeners: ListenerRegistry<dyn ObservesRate>,

    e: RwLock<TempoModelEphemerals>,
}
#[derive(Debug, Default, Clone, Copy)]
struct TempoModelEphemerals {
    rate: Bpm,
    state: TransportState,
}
impl TempoModel {
    /// Creates a model, initially off, that commands the given generator.
    pub fn new_with(generator: impl PulseGenerator + 'static) -> Self {
        Self::new_with_settings(generator, TempoSettings::default())
    }

    #[allow(missing_docs)]
    pub fn new_with_settings(
        generator: impl PulseGenerator + 'static,
        settings: TempoSettings,
    ) -> Self {
        Self {
            generator: Mutex::new(Box::new(generator)),
            settings,
            beat_listeners: Default::default(),
            rate_listeners: Default::default(),
            e: Default::default(),
        }
    }

    /// Starts the generator, then sets the rate to the configured default.
    ///
    /// Calling this while already on restarts the generator and resets the
    /// rate. If the generator starts but refuses the rate, it's stopped again
    /// and the model stays off.
    pub fn turn_on(&self) -> anyhow::Result<()> {
        log::debug!("TempoModel: turning on");
        let previous_state = self.state();
        self.lock_generator()?.start()?;
        self.write_ephemerals().state = TransportState::On;
        if let Err(e) = self.set_rate(self.settings.default_rate()) {
            self.write_ephemerals().state = previous_state;
            if previous_state == TransportState::Off {
                if let Err(stop_error) = self.lock_generator().and_then(|mut g| g.stop()) {
                    log::warn!(
                        "TempoModel: couldn't stop generator after failed start: {stop_error:#}"
                    );
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Sets the rate to zero, then stops the generator. Rate listeners hear
    /// about the zero before the generator is told to stop.
    ///
    /// If the generator refuses to stop, the previous rate is restored (and
    /// announced) so that listeners agree with a generator that's still
    /// running.
    pub fn turn_off(&self) -> anyhow::Result<()> {
        log::debug!("TempoModel: turning off");
        let previous_rate = self.rate();
        self.set_rate(Bpm::OFF)?;
        if let Err(e) = self.lock_generator().and_then(|mut g| g.stop()) {
            if let Err(restore_error) = self.set_rate(previous_rate) {
                log::warn!("TempoModel: couldn't restore {previous_rate}: {restore_error:#}");
            }
            return Err(e);
        }
        self.write_ephemerals().state = TransportState::Off;
        Ok(())
    }

    /// Changes the rate. Any value is accepted unless the settings ask for
    /// negative rates to be clamped. The generator gets the new rate first;
    /// if it refuses, nothing changes and nobody is notified.
    pub fn set_rate(&self, rate: Bpm) -> anyhow::Result<()> {
        let rate = self.settings.rate_policy().apply(rate);
        {
            let mut generator = self.lock_generator()?;
            generator.set_rate(rate)?;
            self.write_ephemerals().rate = rate;
        }
        log::debug!("TempoModel: rate is now {rate}");
        self.notify_rate(rate);
        Ok(())
    }

    /// The current rate.
    pub fn rate(&self) -> Bpm {
        self.read_ephemerals().rate
    }

    #[allow(missing_docs)]
    pub fn state(&self) -> TransportState {
        self.read_ephemerals().state
    }

    /// Whether the generator has been started and not since stopped.
    pub fn is_running(&self) -> bool {
        self.state() == TransportState::On
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &TempoSettings {
        &self.settings
    }

    /// The generator produced a beat.
    pub fn on_beat_tick(&self) {
        log::trace!("TempoModel: beat");
        self.notify_beat_observers();
    }

    #[allow(missing_docs)]
    pub fn register_beat_observer(&self, uid: ListenerUid, observer: BeatObserver) {
        log::trace!("TempoModel: registering beat observer {uid}");
        self.beat_listeners.register(uid, observer);
    }

    /// Removes every beat observer registered under `uid`.
    pub fn unregister_beat_observer(&self, uid: ListenerUid) {
        let removed = self.beat_listeners.unregister(uid);
        log::trace!("TempoModel: unregistered beat observer {uid} ({removed} entries)");
    }

    #[allow(missing_docs)]
    pub fn register_rate_observer(&self, uid: ListenerUid, observer: RateObserver) {
        log::trace!("TempoModel: registering rate observer {uid}");
        self.rate_listeners.register(uid, observer);
    }

    /// Removes every rate observer registered under `uid`.
    pub fn unregister_rate_observer(&self, uid: ListenerUid) {
        let removed = self.rate_listeners.unregister(uid);
        log::trace!("TempoModel: unregistered rate observer {uid} ({removed} entries)");
    }

    /// The uids of current beat observers, in notification order.
    pub fn beat_observer_uids(&self) -> Vec<ListenerUid> {
        self.beat_listeners.uids()
    }

    /// The uids of current rate observers, in notification order.
    pub fn rate_observer_uids(&self) -> Vec<ListenerUid> {
        self.rate_listeners.uids()
    }

    /// Tells every beat observer that a beat happened.
    pub fn notify_beat_observers(&self) {
        self.beat_listeners.notify_each(|o| o.update_beat());
    }

    /// Tells every rate observer the current rate.
    pub fn notify_rate_observers(&self) {
        self.notify_rate(self.rate());
    }

    fn notify_rate(&self, rate: Bpm) {
        self.rate_listeners.notify_each(|o| o.update_rate(rate));
    }

    // A generator that panicked mid-command may be out of step with us, so we
    // refuse to keep driving it.
    fn lock_generator(&self) -> anyhow::Result<MutexGuard<'_, Box<dyn PulseGenerator>>> {
        self.generator
            .lock()
            .map_err(|_| anyhow!("pulse generator is unusable after an earlier panic"))
    }

    fn read_ephemerals(&self) -> TempoModelEphemerals {
        *self.e.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_ephemerals(&self) -> std::sync::RwLockWriteGuard<'_, TempoModelEphemerals> {
        self.e.write().unwrap_or_else(PoisonError::into_inner)
    }
}
