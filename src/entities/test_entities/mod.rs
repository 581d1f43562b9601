// Copyright (c) 2024 Mike Tsao

//! Test generators and observers. These are designed with an emphasis on
//! instrumentation and introspection: they write everything that happens to
//! them into a shared [EventLog], so a test can check the exact interleaving
//! of generator commands and listener notifications.

pub use generators::{FailingPulseGenerator, PulseCommand, RecordingPulseGenerator};
pub use journal::{EventLog, LoggedEvent};
pub use observers::RecordingObserver;

mod generators;
mod journal;
mod observers;
