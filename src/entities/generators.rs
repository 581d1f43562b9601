// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;

/// A [PulseGenerator] with no hardware behind it. It remembers what it was
/// told and logs each command, which is enough for a model that gets its
/// beats from somewhere else (or not at all).
#[derive(Debug, Default)]
pub struct SilentPulseGenerator {
    is_started: bool,
    rate: Bpm,
}
impl SilentPulseGenerator {
    #[allow(missing_docs)]
    pub fn is_started(&self) -> bool {
        self.is_started
    }

    #[allow(missing_docs)]
    pub fn rate(&self) -> Bpm {
        self.rate
    }
}
impl PulseGenerator for SilentPulseGenerator {
    fn start(&mut self) -> anyhow::Result<()> {
        log::info!("SilentPulseGenerator: start");
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        log::info!("SilentPulseGenerator: stop");
        self.is_started = false;
        Ok(())
    }

    fn set_rate(&mut self, rate: Bpm) -> anyhow::Result<()> {
        log::info!("SilentPulseGenerator: set_rate({rate})");
        self.rate = rate;
        Ok(())
    }
}
