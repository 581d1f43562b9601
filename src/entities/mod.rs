// Copyright (c) 2024 Mike Tsao

//! Concrete generators and observers that plug into the tempo model.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Button, RateReadout, SilentPulseGenerator, TempoDisplay};
}

pub use display::{Button, RateReadout, TempoDisplay};
pub use generators::SilentPulseGenerator;

pub mod test_entities;

mod display;
mod generators;
