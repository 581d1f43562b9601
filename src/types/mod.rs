// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Bpm, ListenerUid, ListenerUidFactory, TransportState};
}

pub use {
    tempo::{Bpm, TransportState},
    uid::{ListenerUid, ListenerUidFactory},
};

mod tempo;
mod uid;
