// Copyright (c) 2024 Mike Tsao

//! Wrappers that run the beatkeeper tempo model behind crossbeam channels,
//! and a pulse generator that produces real beats.

#![deny(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        Metronome, ProvidesService, TempoService, TempoServiceEvent, TempoServiceInput,
    };
}

pub use channels::CrossbeamChannel;
pub use metronome::{Metronome, TickFn};
pub use tempo::{TempoService, TempoServiceEvent, TempoServiceInput};
pub use traits::ProvidesService;

mod channels;
mod metronome;
mod tempo;
mod traits;
