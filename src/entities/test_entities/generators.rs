// Copyright (c) 2024 Mike Tsao

use super::{EventLog, LoggedEvent};
use crate::prelude::*;
use anyhow::anyhow;
use derivative::Derivative;

/// The commands a [PulseGenerator] can receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PulseCommand {
    #[allow(missing_docs)]
    Start,
    #[allow(missing_docs)]
    Stop,
    #[allow(missing_docs)]
    SetRate(Bpm),
}

/// A [PulseGenerator] that does nothing but write down what it was asked to
/// do.
#[derive(Debug, Default)]
pub struct RecordingPulseGenerator {
    log: EventLog,
}
impl RecordingPulseGenerator {
    #[allow(missing_docs)]
    pub fn new_with(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}
impl PulseGenerator for RecordingPulseGenerator {
    fn start(&mut self) -> anyhow::Result<()> {
        self.log.push(LoggedEvent::Pulse(PulseCommand::Start));
        Ok(())
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        self.log.push(LoggedEvent::Pulse(PulseCommand::Stop));
        Ok(())
    }

    fn set_rate(&mut self, rate: Bpm) -> anyhow::Result<()> {
        self.log.push(LoggedEvent::Pulse(PulseCommand::SetRate(rate)));
        Ok(())
    }
}

/// A [PulseGenerator] that refuses some or all commands. The default refuses
/// everything. Accepted commands are written to its [EventLog].
#[derive(Debug, Derivative)]
#[derivative(Default)]
pub struct FailingPulseGenerator {
    #[derivative(Default(value = "true"))]
    refuses_start: bool,
    #[derivative(Default(value = "true"))]
    refuses_stop: bool,
    #[derivative(Default(value = "true"))]
    refuses_set_rate: bool,
    log: EventLog,
}
impl FailingPulseGenerator {
    /// Accepts start and stop, but refuses every rate.
    pub fn refusing_set_rate(log: &EventLog) -> Self {
        Self {
            refuses_start: false,
            refuses_stop: false,
            refuses_set_rate: true,
            log: log.clone(),
        }
    }

    /// Accepts start and rates, but won't stop.
    pub fn refusing_stop(log: &EventLog) -> Self {
        Self {
            refuses_start: false,
            refuses_stop: true,
            refuses_set_rate: false,
            log: log.clone(),
        }
    }

    fn accept_or_refuse(&self, refuses: bool, command: PulseCommand) -> anyhow::Result<()> {
        if refuses {
            Err(anyhow!("FailingPulseGenerator: {command:?} refused"))
        } else {
            self.log.push(LoggedEvent::Pulse(command));
            Ok(())
        }
    }
}
impl PulseGenerator for FailingPulseGenerator {
    fn start(&mut self) -> anyhow::Result<()> {
        self.accept_or_refuse(self.refuses_start, PulseCommand::Start)
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        self.accept_or_refuse(self.refuses_stop, PulseCommand::Stop)
    }

    fn set_rate(&mut self, rate: Bpm) -> anyhow::Result<()> {
        self.accept_or_refuse(self.refuses_set_rate, PulseCommand::SetRate(rate))
    }
}
