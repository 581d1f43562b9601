// Copyright (c) 2024 Mike Tsao

//! The tempo state machine.

/// The most commonly used imports.
pub mod prelude {
    pub use super::TempoModel;
}

pub use tempo::TempoModel;

mod tempo;
