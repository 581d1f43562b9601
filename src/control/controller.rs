// Copyright (c) 2024 Mike Tsao

use super::Intent;
use crate::prelude::*;
use anyhow::anyhow;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

/// Turns user intents into [TempoModel] calls, and keeps the bound view's
/// start/stop controls in step with whether the model is running.
///
/// The controller goes through the model's public methods only; it never
/// talks to the pulse generator or to listener registries. View updates
/// happen only after the model call succeeds.
pub struct Controller {
    model: Arc<TempoModel>,
    view: Arc<RwLock<dyn TransportAffordances>>,
}
impl core::fmt::Debug for Controller {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
impl Controller {
    #[allow(missing_docs)]
    pub fn new_with(model: Arc<TempoModel>, view: Arc<RwLock<dyn TransportAffordances>>) -> Self {
        Self { model, view }
    }

    #[allow(missing_docs)]
    pub fn model(&self) -> &Arc<TempoModel> {
        &self.model
    }

    /// Routes an [Intent] to the operation of the same name.
    pub fn dispatch(&self, intent: Intent) -> anyhow::Result<()> {
        log::debug!("Controller: dispatching {intent:?}");
        match intent {
            Intent::Start => self.start(),
            Intent::Stop => self.stop(),
            Intent::SetRate(rate) => self.set_rate(rate),
            Intent::Increase => self.increase_rate(),
            Intent::Decrease => self.decrease_rate(),
        }
    }

    /// Turns the model on, then disables start and enables stop.
    pub fn start(&self) -> anyhow::Result<()> {
        self.model.turn_on()?;
        let mut view = self.lock_view()?;
        view.disable_start();
        view.enable_stop();
        Ok(())
    }

    /// Turns the model off, then enables start and disables stop.
    pub fn stop(&self) -> anyhow::Result<()> {
        self.model.turn_off()?;
        let mut view = self.lock_view()?;
        view.enable_start();
        view.disable_stop();
        Ok(())
    }

    /// Raises the rate by one step. Each call is its own rate change.
    pub fn increase_rate(&self) -> anyhow::Result<()> {
        let step = self.model.settings().rate_step();
        self.model.set_rate(self.model.rate().offset_by(step))
    }

    /// Lowers the rate by one step. This can go below zero unless the
    /// settings clamp negative rates.
    pub fn decrease_rate(&self) -> anyhow::Result<()> {
        let step = self.model.settings().rate_step();
        self.model.set_rate(self.model.rate().offset_by(Bpm(step.0.saturating_neg())))
    }

    #[allow(missing_docs)]
    pub fn set_rate(&self, rate: Bpm) -> anyhow::Result<()> {
        self.model.set_rate(rate)
    }

    fn lock_view(
        &self,
    ) -> anyhow::Result<RwLockWriteGuard<'_, dyn TransportAffordances + 'static>> {
        self.view
            .write()
            .map_err(|_| anyhow!("view is unusable after an earlier panic"))
    }
}
