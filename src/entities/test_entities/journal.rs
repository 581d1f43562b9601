// Copyright (c) 2024 Mike Tsao

use super::PulseCommand;
use crate::prelude::*;
use std::sync::{Arc, Mutex, PoisonError};

/// One thing that happened to a test entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggedEvent {
    /// The generator received a command.
    Pulse(PulseCommand),
    /// A beat observer was told about a beat.
    Beat(ListenerUid),
    /// A rate observer was told about a new rate.
    Rate(ListenerUid, Bpm),
}

/// A shared, append-only journal. Clones write to the same journal.
#[derive(Clone, Debug, Default)]
pub struct EventLog(Arc<Mutex<Vec<LoggedEvent>>>);
#[allow(missing_docs)]
impl EventLog {
    pub fn push(&self, event: LoggedEvent) {
        self.lock().push(event);
    }

    /// Returns everything logged so far and empties the journal.
    pub fn take(&self) -> Vec<LoggedEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns everything logged so far, leaving the journal alone.
    pub fn events(&self) -> Vec<LoggedEvent> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn pulse_commands(&self) -> Vec<PulseCommand> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                LoggedEvent::Pulse(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn beats(&self) -> Vec<ListenerUid> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                LoggedEvent::Beat(uid) => Some(*uid),
                _ => None,
            })
            .collect()
    }

    pub fn rates(&self) -> Vec<(ListenerUid, Bpm)> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                LoggedEvent::Rate(uid, rate) => Some((*uid, *rate)),
                _ => None,
            })
            .collect()
    }

    /// The position of the first event equal to `event`, if any.
    pub fn position_of(&self, event: LoggedEvent) -> Option<usize> {
        self.lock().iter().position(|e| *e == event)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LoggedEvent>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
