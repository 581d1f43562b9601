// Copyright (c) 2024 Mike Tsao

//! Configuration for the tempo model. Intended to be serialized.

use crate::prelude::*;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Problems loading or saving [TempoSettings].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[allow(missing_docs)]
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[allow(missing_docs)]
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Increase/decrease would move the wrong way, or not at all.
    #[error("rate step must be positive, got {0}")]
    InvalidRateStep(Bpm),
}

/// What the model does with a rate below zero.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum RatePolicy {
    /// Store and forward whatever the caller asked for.
    #[default]
    AllowNegative,
    /// Negative rates become zero before they reach the generator.
    ClampToZero,
}
impl RatePolicy {
    /// Returns the rate that the model should actually use.
    pub fn apply(&self, rate: Bpm) -> Bpm {
        match self {
            RatePolicy::AllowNegative => rate,
            RatePolicy::ClampToZero => Bpm(rate.0.max(0)),
        }
    }
}

/// Persistent tempo settings. This is configuration, not history; the
/// current rate is never saved.
#[derive(Debug, Clone, Builder, Derivative, Serialize, Deserialize)]
#[derivative(Default, PartialEq)]
#[builder(default, build_fn(validate = "Self::validate"))]
#[serde(default, rename_all = "kebab-case")]
pub struct TempoSettings {
    /// The rate the model adopts when it's turned on.
    #[derivative(Default(value = "Bpm::DEFAULT_ON"))]
    default_rate: Bpm,

    /// How far a single increase or decrease moves the rate. Always positive.
    #[derivative(Default(value = "Bpm(1)"))]
    #[serde(deserialize_with = "deserialize_rate_step")]
    rate_step: Bpm,

    #[allow(missing_docs)]
    rate_policy: RatePolicy,

    #[serde(skip)]
    #[builder(setter(skip))]
    #[derivative(PartialEq = "ignore")]
    has_been_saved: bool,
}
impl HasSettings for TempoSettings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
#[allow(missing_docs)]
impl TempoSettings {
    pub fn default_rate(&self) -> Bpm {
        self.default_rate
    }

    pub fn rate_step(&self) -> Bpm {
        self.rate_step
    }

    pub fn rate_policy(&self) -> RatePolicy {
        self.rate_policy
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_default_rate(&mut self, rate: Bpm) {
        if rate != self.default_rate {
            self.default_rate = rate;
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save. A step that
    /// isn't positive is rejected and the old step is kept.
    pub fn set_rate_step(&mut self, step: Bpm) -> Result<(), SettingsError> {
        if step.0 <= 0 {
            return Err(SettingsError::InvalidRateStep(step));
        }
        if step != self.rate_step {
            self.rate_step = step;
            self.needs_save();
        }
        Ok(())
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_rate_policy(&mut self, policy: RatePolicy) {
        if policy != self.rate_policy {
            self.rate_policy = policy;
            self.needs_save();
        }
    }

    /// Reads settings from a JSON file. Keys that are missing take their
    /// default values.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&json)?;
        settings.mark_clean();
        log::debug!("Loaded tempo settings from {path:?}: {settings:?}");
        Ok(settings)
    }

    /// Writes settings to a JSON file.
    pub fn save(&mut self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        self.mark_clean();
        log::debug!("Saved tempo settings to {path:?}");
        Ok(())
    }
}

fn deserialize_rate_step<'de, D>(deserializer: D) -> Result<Bpm, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let step = Bpm::deserialize(deserializer)?;
    if step.0 <= 0 {
        return Err(serde::de::Error::custom(SettingsError::InvalidRateStep(step)));
    }
    Ok(step)
}

impl TempoSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.rate_step {
            Some(step) if step.0 <= 0 => Err(format!("rate step must be positive, got {step}")),
            _ => Ok(()),
        }
    }
}
