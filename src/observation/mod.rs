// Copyright (c) 2024 Mike Tsao

//! Registries that hold listeners and tell them when something happens.

/// The most commonly used imports.
pub mod prelude {
    pub use super::ListenerRegistry;
}

pub use registry::ListenerRegistry;

mod registry;
