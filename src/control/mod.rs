// Copyright (c) 2024 Mike Tsao

//! Routing from user intents to the tempo model.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Controller, Intent};
}

pub use controller::Controller;
pub use intent::Intent;

mod controller;
mod intent;
