// Copyright (c) 2024 Mike Tsao

use super::{EventLog, LoggedEvent};
use crate::prelude::*;

/// Observes beats and rates, and logs each notification under its uid.
#[derive(Debug)]
pub struct RecordingObserver {
    uid: ListenerUid,
    log: EventLog,
}
impl RecordingObserver {
    #[allow(missing_docs)]
    pub fn new_with(uid: ListenerUid, log: &EventLog) -> Self {
        Self {
            uid,
            log: log.clone(),
        }
    }

    #[allow(missing_docs)]
    pub fn uid(&self) -> ListenerUid {
        self.uid
    }
}
impl ObservesBeat for RecordingObserver {
    fn update_beat(&mut self) {
        self.log.push(LoggedEvent::Beat(self.uid));
    }
}
impl ObservesRate for RecordingObserver {
    fn update_rate(&mut self, rate: Bpm) {
        self.log.push(LoggedEvent::Rate(self.uid, rate));
    }
}
