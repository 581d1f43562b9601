// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{RatePolicy, TempoSettings, TempoSettingsBuilder};
}

pub use settings::{RatePolicy, SettingsError, TempoSettings, TempoSettingsBuilder};

mod settings;
