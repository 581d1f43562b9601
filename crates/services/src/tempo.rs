// Copyright (c) 2024 Mike Tsao

//! Runs a [TempoModel] on its own thread.

use crate::{CrossbeamChannel, Metronome, ProvidesService};
use beatkeeper::prelude::*;
use crossbeam::channel::{Receiver, Sender};
use std::sync::{Arc, RwLock};

/// The client drives the tempo through [TempoServiceInput] messages.
#[derive(Clone, Debug)]
pub enum TempoServiceInput {
    /// Something the user wants, routed through the service's
    /// [Controller].
    Intent(Intent),

    /// The pulse generator produced a beat. Ignored unless the model is
    /// running.
    BeatTick,

    /// The app is ready to quit, so the service should end.
    Quit,
}

/// The service reports back through [TempoServiceEvent] messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TempoServiceEvent {
    /// The model's rate changed. Zero means it was turned off.
    RateChanged(Bpm),

    /// A beat happened.
    Beat,

    /// Start or stop changed which transport controls should be enabled.
    AffordancesChanged {
        #[allow(missing_docs)]
        start_enabled: bool,
        #[allow(missing_docs)]
        stop_enabled: bool,
    },

    /// The intent couldn't be carried out, usually because the pulse
    /// generator refused a command. The model's state didn't change.
    IntentFailed(Intent, String),

    /// The service has processed [TempoServiceInput::Quit] and will go away
    /// shortly.
    Quit,
}

/// A channel-based wrapper around a [TempoModel], its [Controller], and a
/// view that turns notifications into [TempoServiceEvent]s.
///
/// All model mutation happens on the service's daemon thread. Beats from a
/// [Metronome] arrive as [TempoServiceInput::BeatTick] messages on the same
/// input channel as intents, so they are serialized with everything else.
#[derive(Debug)]
pub struct TempoService {
    inputs: CrossbeamChannel<TempoServiceInput>,
    events: CrossbeamChannel<TempoServiceEvent>,
}
impl ProvidesService<TempoServiceInput, TempoServiceEvent> for TempoService {
    fn sender(&self) -> &Sender<TempoServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<TempoServiceEvent> {
        &self.events.receiver
    }
}
impl TempoService {
    /// Creates a service whose beats come from a [Metronome].
    pub fn new_with(settings: TempoSettings) -> Self {
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
        };
        let tick_sender = r.inputs.sender.clone();
        let metronome = Metronome::new_with(move || {
            let _ = tick_sender.send(TempoServiceInput::BeatTick);
        });
        r.spawn_thread(metronome, settings);
        r
    }

    /// Creates a service that commands the given generator. Beats arrive only
    /// when someone sends [TempoServiceInput::BeatTick].
    pub fn new_with_generator(
        generator: impl PulseGenerator + 'static,
        settings: TempoSettings,
    ) -> Self {
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
        };
        r.spawn_thread(generator, settings);
        r
    }

    fn spawn_thread(&self, generator: impl PulseGenerator + 'static, settings: TempoSettings) {
        let receiver = self.inputs.receiver.clone();
        let sender = self.events.sender.clone();
        std::thread::spawn(move || {
            let mut daemon = TempoServiceDaemon::new_with(receiver, sender, generator, settings);
            daemon.execute();
        });
    }
}
impl Drop for TempoService {
    fn drop(&mut self) {
        // The metronome's tick function holds a sender to our inputs, so the
        // daemon won't see a disconnect on its own.
        let _ = self.inputs.sender.send(TempoServiceInput::Quit);
    }
}

/// Forwards model notifications to the service's event channel, and remembers
/// the transport affordances the controller asked for.
struct EventForwardingView {
    sender: Sender<TempoServiceEvent>,
    start_enabled: bool,
    stop_enabled: bool,
    affordances_changed: bool,
}
impl EventForwardingView {
    fn new_with(sender: Sender<TempoServiceEvent>) -> Self {
        Self {
            sender,
            start_enabled: true,
            stop_enabled: false,
            affordances_changed: false,
        }
    }

    fn send(&self, event: TempoServiceEvent) {
        if let Err(e) = self.sender.send(event) {
            log::warn!("TempoService: nobody is listening for {:?}", e.0);
        }
    }

    /// Returns the affordance event to send, if the controller changed
    /// anything since the last call.
    fn take_affordances_event(&mut self) -> Option<TempoServiceEvent> {
        std::mem::take(&mut self.affordances_changed).then_some(
            TempoServiceEvent::AffordancesChanged {
                start_enabled: self.start_enabled,
                stop_enabled: self.stop_enabled,
            },
        )
    }
}
impl ObservesBeat for EventForwardingView {
    fn update_beat(&mut self) {
        self.send(TempoServiceEvent::Beat);
    }
}
impl ObservesRate for EventForwardingView {
    fn update_rate(&mut self, rate: Bpm) {
        self.send(TempoServiceEvent::RateChanged(rate));
    }
}
impl TransportAffordances for EventForwardingView {
    fn enable_start(&mut self) {
        self.start_enabled = true;
        self.affordances_changed = true;
    }

    fn disable_start(&mut self) {
        self.start_enabled = false;
        self.affordances_changed = true;
    }

    fn enable_stop(&mut self) {
        self.stop_enabled = true;
        self.affordances_changed = true;
    }

    fn disable_stop(&mut self) {
        self.stop_enabled = false;
        self.affordances_changed = true;
    }
}

struct TempoServiceDaemon {
    receiver: Receiver<TempoServiceInput>,
    sender: Sender<TempoServiceEvent>,

    model: Arc<TempoModel>,
    view: Arc<RwLock<EventForwardingView>>,
    controller: Controller,
}
impl TempoServiceDaemon {
    fn new_with(
        receiver: Receiver<TempoServiceInput>,
        sender: Sender<TempoServiceEvent>,
        generator: impl PulseGenerator + 'static,
        settings: TempoSettings,
    ) -> Self {
        let model = Arc::new(TempoModel::new_with_settings(generator, settings));
        let view = Arc::new(RwLock::new(EventForwardingView::new_with(sender.clone())));
        let uid = ListenerUidFactory::default().mint_next();
        model.register_beat_observer(uid, view.clone());
        model.register_rate_observer(uid, view.clone());
        let controller = Controller::new_with(Arc::clone(&model), view.clone());
        Self {
            receiver,
            sender,
            model,
            view,
            controller,
        }
    }

    fn send_affordances_if_changed(&self) {
        let event = match self.view.write() {
            Ok(mut view) => view.take_affordances_event(),
            Err(_) => None,
        };
        if let Some(event) = event {
            let _ = self.sender.send(event);
        }
    }

    fn execute(&mut self) {
        while let Ok(input) = self.receiver.recv() {
            match input {
                TempoServiceInput::Intent(intent) => {
                    if let Err(e) = self.controller.dispatch(intent) {
                        log::warn!("TempoService: {intent} failed: {e:#}");
                        let _ = self
                            .sender
                            .send(TempoServiceEvent::IntentFailed(intent, format!("{e:#}")));
                    }
                    self.send_affordances_if_changed();
                }
                TempoServiceInput::BeatTick => {
                    // The metronome may have queued ticks before it heard
                    // about a stop.
                    if self.model.is_running() {
                        self.model.on_beat_tick();
                    } else {
                        log::trace!("TempoService: dropping beat tick while stopped");
                    }
                }
                TempoServiceInput::Quit => {
                    log::debug!("TempoServiceInput::Quit");
                    let _ = self.sender.send(TempoServiceEvent::Quit);
                    break;
                }
            }
        }
        log::debug!("TempoServiceDaemon exit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatkeeper::entities::test_entities::{
        EventLog, FailingPulseGenerator, PulseCommand, RecordingPulseGenerator,
    };
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn service_with(generator: impl PulseGenerator + 'static) -> TempoService {
        let _ = env_logger::builder().is_test(true).try_init();
        TempoService::new_with_generator(generator, TempoSettings::default())
    }

    fn next_event(service: &TempoService) -> TempoServiceEvent {
        service.receiver().recv_timeout(TIMEOUT).unwrap()
    }

    fn assert_quiet(service: &TempoService) {
        let extra = service.receiver().recv_timeout(Duration::from_millis(50));
        assert!(extra.is_err(), "unexpected {extra:?}");
    }

    fn start_and_drain(service: &TempoService) {
        service.send_input(TempoServiceInput::Intent(Intent::Start));
        assert_eq!(next_event(service), TempoServiceEvent::RateChanged(Bpm(90)));
        assert!(matches!(
            next_event(service),
            TempoServiceEvent::AffordancesChanged { .. }
        ));
    }

    #[test]
    fn start_reports_rate_then_affordances() {
        let log = EventLog::default();
        let service = service_with(RecordingPulseGenerator::new_with(&log));

        service.send_input(TempoServiceInput::Intent(Intent::Start));
        assert_eq!(next_event(&service), TempoServiceEvent::RateChanged(Bpm(90)));
        assert_eq!(
            next_event(&service),
            TempoServiceEvent::AffordancesChanged {
                start_enabled: false,
                stop_enabled: true
            }
        );

        service.send_input(TempoServiceInput::Intent(Intent::Increase));
        assert_eq!(next_event(&service), TempoServiceEvent::RateChanged(Bpm(91)));

        service.send_input(TempoServiceInput::Intent(Intent::Stop));
        assert_eq!(next_event(&service), TempoServiceEvent::RateChanged(Bpm(0)));
        assert_eq!(
            next_event(&service),
            TempoServiceEvent::AffordancesChanged {
                start_enabled: true,
                stop_enabled: false
            }
        );

        service.send_input(TempoServiceInput::Quit);
        assert_eq!(next_event(&service), TempoServiceEvent::Quit);
        assert_eq!(
            log.pulse_commands(),
            vec![
                PulseCommand::Start,
                PulseCommand::SetRate(Bpm(90)),
                PulseCommand::SetRate(Bpm(91)),
                PulseCommand::SetRate(Bpm(0)),
                PulseCommand::Stop,
            ]
        );
    }

    #[test]
    fn beat_ticks_become_beat_events() {
        let service = service_with(RecordingPulseGenerator::default());
        start_and_drain(&service);
        service.send_input(TempoServiceInput::BeatTick);
        service.send_input(TempoServiceInput::BeatTick);
        assert_eq!(next_event(&service), TempoServiceEvent::Beat);
        assert_eq!(next_event(&service), TempoServiceEvent::Beat);
    }

    #[test]
    fn beat_ticks_after_stop_are_dropped() {
        let service = service_with(RecordingPulseGenerator::default());
        service.send_input(TempoServiceInput::BeatTick);
        assert_quiet(&service);

        start_and_drain(&service);
        service.send_input(TempoServiceInput::Intent(Intent::Stop));
        service.send_input(TempoServiceInput::BeatTick);
        assert_eq!(next_event(&service), TempoServiceEvent::RateChanged(Bpm(0)));
        assert!(matches!(
            next_event(&service),
            TempoServiceEvent::AffordancesChanged { .. }
        ));
        assert_quiet(&service);
    }

    #[test]
    fn rate_changes_without_affordance_noise() {
        let service = service_with(RecordingPulseGenerator::default());
        service.send_input(TempoServiceInput::Intent(Intent::Decrease));
        service.send_input(TempoServiceInput::Intent(Intent::SetRate(Bpm(100))));
        assert_eq!(next_event(&service), TempoServiceEvent::RateChanged(Bpm(-1)));
        assert_eq!(next_event(&service), TempoServiceEvent::RateChanged(Bpm(100)));
        assert_quiet(&service);
    }

    #[test]
    fn refused_intent_is_reported() {
        let service = service_with(FailingPulseGenerator::default());
        service.send_input(TempoServiceInput::Intent(Intent::Start));
        match next_event(&service) {
            TempoServiceEvent::IntentFailed(intent, message) => {
                assert_eq!(intent, Intent::Start);
                assert!(message.contains("Start refused"), "{message}");
            }
            other => panic!("expected IntentFailed, got {other:?}"),
        }
        // A failed start doesn't touch the affordances.
        assert_quiet(&service);
    }

    #[test]
    fn metronome_drives_beats() {
        let _ = env_logger::builder().is_test(true).try_init();
        let service = TempoService::new_with(
            TempoSettingsBuilder::default()
                .default_rate(Bpm(1200))
                .build()
                .unwrap(),
        );
        service.send_input(TempoServiceInput::Intent(Intent::Start));

        let mut beats = 0;
        while beats < 3 {
            match next_event(&service) {
                TempoServiceEvent::Beat => beats += 1,
                TempoServiceEvent::RateChanged(rate) => assert_eq!(rate, Bpm(1200)),
                TempoServiceEvent::AffordancesChanged { .. } => {}
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
