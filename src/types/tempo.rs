// Copyright (c) 2024 Mike Tsao

//! The tempo value that the model broadcasts.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};
use synonym::Synonym;

/// Beats per minute.
///
/// This is signed on purpose. Nothing in the model clamps the rate unless
/// [RatePolicy::ClampToZero](crate::util::RatePolicy::ClampToZero) is
/// selected, so repeated decreases can take it below zero.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Bpm(pub i32);
#[allow(missing_docs)]
impl Bpm {
    /// The rate the model jumps to when it's turned on.
    pub const DEFAULT_ON: Bpm = Bpm(90);
    /// The rate the model reports while it's off. Observers treat this as
    /// "stopped."
    pub const OFF: Bpm = Bpm(0);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Whether an observer should present this rate as stopped/offline.
    pub const fn is_stopped(&self) -> bool {
        self.0 == 0
    }

    /// Returns this rate moved by `step`. Saturates rather than wrapping at
    /// the edges of i32.
    pub const fn offset_by(&self, step: Bpm) -> Self {
        Self(self.0.saturating_add(step.0))
    }

    /// Seconds between beats, or None if the rate can't produce beats.
    pub fn beat_period_seconds(&self) -> Option<f64> {
        (self.0 > 0).then(|| 60.0 / self.0 as f64)
    }
}

/// The two states of the tempo model.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, IntoStaticStr, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TransportState {
    /// The generator is stopped and the rate is zero.
    #[default]
    Off,
    /// The generator is running.
    On,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpm_offsets_in_both_directions() {
        let bpm = Bpm::DEFAULT_ON;
        assert_eq!(bpm.offset_by(Bpm(1)), Bpm(91));
        assert_eq!(bpm.offset_by(Bpm(-1)), Bpm(89));
        assert_eq!(Bpm(0).offset_by(Bpm(-1)), Bpm(-1), "no clamping at zero");
        assert_eq!(Bpm(i32::MAX).offset_by(Bpm(1)), Bpm(i32::MAX));
    }

    #[test]
    fn bpm_stopped_and_period() {
        assert!(Bpm::OFF.is_stopped());
        assert!(Bpm::default().is_stopped());
        assert!(!Bpm(-3).is_stopped());

        assert_eq!(Bpm(60).beat_period_seconds(), Some(1.0));
        assert_eq!(Bpm(120).beat_period_seconds(), Some(0.5));
        assert_eq!(Bpm(0).beat_period_seconds(), None);
        assert_eq!(Bpm(-10).beat_period_seconds(), None);
    }

    #[test]
    fn transport_state_names() {
        assert_eq!(TransportState::default(), TransportState::Off);
        let name: &'static str = TransportState::On.into();
        assert_eq!(name, "On");
    }
}
