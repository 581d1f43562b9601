// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// What a [TempoDisplay] shows for the rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateReadout {
    /// The model is off (its rate is zero).
    #[default]
    Offline,
    /// The model is running at this rate.
    Rate(Bpm),
}
impl From<Bpm> for RateReadout {
    fn from(rate: Bpm) -> Self {
        if rate.is_stopped() {
            Self::Offline
        } else {
            Self::Rate(rate)
        }
    }
}
impl fmt::Display for RateReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateReadout::Offline => f.write_str("offline"),
            RateReadout::Rate(rate) => write!(f, "{rate} BPM"),
        }
    }
}

/// The controls on a [TempoDisplay].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
pub enum Button {
    #[allow(missing_docs)]
    Start,
    #[allow(missing_docs)]
    Stop,
    /// Jumps to the rate typed next to it.
    SetRate,
    #[allow(missing_docs)]
    IncreaseRate,
    #[allow(missing_docs)]
    DecreaseRate,
}

/// [TempoDisplay] is the presentation side of the metronome. It listens for
/// beats and rate changes and keeps track of what it would be showing. It
/// doesn't draw anything itself; a UI reads its state.
#[derive(Debug)]
pub struct TempoDisplay {
    uid: ListenerUid,
    readout: RateReadout,
    beat_count: usize,
    is_start_enabled: bool,
    is_stop_enabled: bool,
}
impl TempoDisplay {
    /// Creates a display and registers it with the model for both beats and
    /// rate changes.
    pub fn new_with(uid: ListenerUid, model: &TempoModel) -> Arc<RwLock<Self>> {
        let display = Arc::new(RwLock::new(Self {
            uid,
            readout: RateReadout::from(model.rate()),
            beat_count: Default::default(),
            is_start_enabled: true,
            is_stop_enabled: false,
        }));
        model.register_beat_observer(uid, display.clone());
        model.register_rate_observer(uid, display.clone());
        display
    }

    /// Stops listening to the model.
    pub fn detach(&self, model: &TempoModel) {
        model.unregister_beat_observer(self.uid);
        model.unregister_rate_observer(self.uid);
    }

    /// Turns a click into an [Intent]. A click on [Button::SetRate] with no
    /// rate typed in asks for zero. Clicking a disabled button does nothing.
    pub fn click(&self, button: Button, rate: Option<Bpm>) -> Option<Intent> {
        log::debug!("TempoDisplay {}: {button} clicked", self.uid);
        match button {
            Button::Start => self.is_start_enabled.then_some(Intent::Start),
            Button::Stop => self.is_stop_enabled.then_some(Intent::Stop),
            Button::SetRate => Some(Intent::SetRate(rate.unwrap_or_default())),
            Button::IncreaseRate => Some(Intent::Increase),
            Button::DecreaseRate => Some(Intent::Decrease),
        }
    }

    #[allow(missing_docs)]
    pub fn uid(&self) -> ListenerUid {
        self.uid
    }

    #[allow(missing_docs)]
    pub fn readout(&self) -> RateReadout {
        self.readout
    }

    /// How many beats this display has seen since it was created.
    pub fn beat_count(&self) -> usize {
        self.beat_count
    }

    #[allow(missing_docs)]
    pub fn is_start_enabled(&self) -> bool {
        self.is_start_enabled
    }

    #[allow(missing_docs)]
    pub fn is_stop_enabled(&self) -> bool {
        self.is_stop_enabled
    }
}
impl ObservesBeat for TempoDisplay {
    fn update_beat(&mut self) {
        self.beat_count += 1;
        log::trace!("TempoDisplay {}: beat {}", self.uid, self.beat_count);
    }
}
impl ObservesRate for TempoDisplay {
    fn update_rate(&mut self, rate: Bpm) {
        self.readout = RateReadout::from(rate);
        log::info!("TempoDisplay {}: {}", self.uid, self.readout);
    }
}
impl TransportAffordances for TempoDisplay {
    fn enable_start(&mut self) {
        self.is_start_enabled = true;
    }

    fn disable_start(&mut self) {
        self.is_start_enabled = false;
    }

    fn enable_stop(&mut self) {
        self.is_stop_enabled = true;
    }

    fn disable_stop(&mut self) {
        self.is_stop_enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_entities::RecordingPulseGenerator;
    use strum::IntoEnumIterator;

    fn wired() -> (Arc<TempoModel>, Arc<RwLock<TempoDisplay>>, Controller) {
        let model = Arc::new(TempoModel::new_with(RecordingPulseGenerator::default()));
        let display = TempoDisplay::new_with(ListenerUid(1), &model);
        let controller = Controller::new_with(Arc::clone(&model), display.clone());
        (model, display, controller)
    }

    #[test]
    fn new_display_registers_for_both_events() {
        let (model, display, _) = wired();
        assert_eq!(model.beat_observer_uids(), vec![ListenerUid(1)]);
        assert_eq!(model.rate_observer_uids(), vec![ListenerUid(1)]);

        let display = display.read().unwrap();
        assert_eq!(display.readout(), RateReadout::Offline);
        assert!(display.is_start_enabled());
        assert!(!display.is_stop_enabled());
        assert_eq!(display.beat_count(), 0);
    }

    #[test]
    fn readout_follows_rate_and_shows_offline_at_zero() {
        let (model, display, controller) = wired();

        controller.start().unwrap();
        assert_eq!(display.read().unwrap().readout(), RateReadout::Rate(Bpm(90)));
        assert_eq!(display.read().unwrap().readout().to_string(), "90 BPM");

        controller.increase_rate().unwrap();
        assert_eq!(display.read().unwrap().readout(), RateReadout::Rate(Bpm(91)));

        controller.stop().unwrap();
        assert_eq!(display.read().unwrap().readout(), RateReadout::Offline);
        assert_eq!(display.read().unwrap().readout().to_string(), "offline");

        model.on_beat_tick();
        model.on_beat_tick();
        assert_eq!(display.read().unwrap().beat_count(), 2);
    }

    #[test]
    fn affordances_follow_start_and_stop() {
        let (_, display, controller) = wired();
        controller.start().unwrap();
        {
            let d = display.read().unwrap();
            assert!(!d.is_start_enabled());
            assert!(d.is_stop_enabled());
        }
        controller.stop().unwrap();
        let d = display.read().unwrap();
        assert!(d.is_start_enabled());
        assert!(!d.is_stop_enabled());
    }

    #[test]
    fn clicks_become_intents() {
        let (_, display, controller) = wired();
        let click = |button, rate| display.read().unwrap().click(button, rate);

        assert_eq!(click(Button::Stop, None), None, "stop starts out disabled");
        assert_eq!(click(Button::Start, None), Some(Intent::Start));
        assert_eq!(click(Button::SetRate, Some(Bpm(120))), Some(Intent::SetRate(Bpm(120))));
        assert_eq!(click(Button::SetRate, None), Some(Intent::SetRate(Bpm(0))));
        assert_eq!(click(Button::IncreaseRate, None), Some(Intent::Increase));
        assert_eq!(click(Button::DecreaseRate, None), Some(Intent::Decrease));

        controller.start().unwrap();
        assert_eq!(click(Button::Start, None), None);
        assert_eq!(click(Button::Stop, None), Some(Intent::Stop));

        for button in Button::iter() {
            if let Some(intent) = click(button, Some(Bpm(70))) {
                controller.dispatch(intent).unwrap();
            }
        }
    }

    #[test]
    fn detach_stops_updates() {
        let (model, display, controller) = wired();
        display.read().unwrap().detach(&model);
        assert!(model.beat_observer_uids().is_empty());
        assert!(model.rate_observer_uids().is_empty());

        controller.start().unwrap();
        model.on_beat_tick();
        let d = display.read().unwrap();
        assert_eq!(d.readout(), RateReadout::Offline);
        assert_eq!(d.beat_count(), 0);
        assert!(
            !d.is_start_enabled(),
            "affordances come from the controller, not from registration"
        );
    }
}
