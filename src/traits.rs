// Copyright (c) 2024 Mike Tsao

//! The traits that define the seams between the tempo model and everything
//! that reacts to it or drives it.

use crate::prelude::*;
use std::sync::{Arc, RwLock};

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{
        BeatObserver, HasSettings, ObservesBeat, ObservesRate, PulseGenerator, RateObserver,
        TransportAffordances,
    };
}

/// The device that actually produces beats. The model commands it but knows
/// nothing about how it works.
///
/// Every method may fail. A failure propagates out of whichever model call
/// triggered it, and the model leaves its own state untouched.
pub trait PulseGenerator: core::fmt::Debug + Send {
    /// Begin producing beats.
    fn start(&mut self) -> anyhow::Result<()>;

    /// Stop producing beats.
    fn stop(&mut self) -> anyhow::Result<()>;

    /// Produce beats at the given rate from now on.
    fn set_rate(&mut self, rate: Bpm) -> anyhow::Result<()>;
}

/// Something that wants to know each time a beat happens.
pub trait ObservesBeat: Send + Sync {
    /// A beat just happened.
    fn update_beat(&mut self);
}

/// Something that wants to know each time the rate changes.
pub trait ObservesRate: Send + Sync {
    /// The model's rate is now `rate`. A rate of zero means the model was
    /// turned off; how to present that is up to the observer.
    fn update_rate(&mut self, rate: Bpm);
}

/// How beat listeners are shared with the model.
pub type BeatObserver = Arc<RwLock<dyn ObservesBeat>>;

/// How rate listeners are shared with the model.
pub type RateObserver = Arc<RwLock<dyn ObservesRate>>;

/// A view with start and stop controls whose enabled state tracks whether
/// the model is running.
pub trait TransportAffordances: Send + Sync {
    #[allow(missing_docs)]
    fn enable_start(&mut self);
    #[allow(missing_docs)]
    fn disable_start(&mut self);
    #[allow(missing_docs)]
    fn enable_stop(&mut self);
    #[allow(missing_docs)]
    fn disable_stop(&mut self);
}

/// Settings structs that know whether they've changed since they were last
/// saved. A composed settings struct uses this to manage its parts.
pub trait HasSettings {
    /// Whether the current state of this struct has been saved to disk.
    fn has_been_saved(&self) -> bool;
    /// Call this whenever the struct changes.
    fn needs_save(&mut self);
    /// Call this after a load() or a save().
    fn mark_clean(&mut self);
}
