// Copyright (c) 2024 Mike Tsao

//! A pulse generator that produces beats on a background thread.

use anyhow::anyhow;
use beatkeeper::prelude::*;
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use std::{
    thread::JoinHandle,
    time::{Duration, Instant},
};

/// Called on the ticker thread once per beat.
pub type TickFn = Box<dyn FnMut() + Send>;

#[derive(Debug)]
enum MetronomeInput {
    Start,
    Stop,
    SetRate(Bpm),
    Quit,
}

/// [Metronome] is a [PulseGenerator] backed by a ticker thread. While it's
/// started and its rate is positive, it calls the tick function once every
/// `60 / rate` seconds. Changing the rate restarts the current beat interval.
///
/// Timing is only as good as the OS scheduler. The tick function runs on the
/// ticker thread, so it should hand the beat off (typically by sending on a
/// channel) rather than touch a [TempoModel] directly.
#[derive(Debug)]
pub struct Metronome {
    sender: Sender<MetronomeInput>,
    handle: Option<JoinHandle<()>>,
}
impl Metronome {
    /// Spawns the ticker thread. It doesn't tick until started.
    pub fn new_with(tick_fn: impl FnMut() + Send + 'static) -> Self {
        let (sender, receiver) = crossbeam::channel::unbounded();
        let tick_fn: TickFn = Box::new(tick_fn);
        let handle = std::thread::spawn(move || {
            MetronomeDaemon::new_with(receiver, tick_fn).execute();
        });
        Self {
            sender,
            handle: Some(handle),
        }
    }

    fn send(&self, input: MetronomeInput) -> anyhow::Result<()> {
        self.sender
            .send(input)
            .map_err(|e| anyhow!("Metronome: ticker thread has exited ({:?})", e.0))
    }
}
impl PulseGenerator for Metronome {
    fn start(&mut self) -> anyhow::Result<()> {
        self.send(MetronomeInput::Start)
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        self.send(MetronomeInput::Stop)
    }

    fn set_rate(&mut self, rate: Bpm) -> anyhow::Result<()> {
        self.send(MetronomeInput::SetRate(rate))
    }
}
impl Drop for Metronome {
    fn drop(&mut self) {
        let _ = self.sender.send(MetronomeInput::Quit);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Metronome: ticker thread panicked");
            }
        }
    }
}

struct MetronomeDaemon {
    receiver: Receiver<MetronomeInput>,
    tick_fn: TickFn,

    is_started: bool,
    rate: Bpm,
    next_beat: Option<Instant>,
}
impl MetronomeDaemon {
    fn new_with(receiver: Receiver<MetronomeInput>, tick_fn: TickFn) -> Self {
        Self {
            receiver,
            tick_fn,
            is_started: false,
            rate: Bpm::OFF,
            next_beat: None,
        }
    }

    fn beat_period(&self) -> Option<Duration> {
        if self.is_started {
            self.rate.beat_period_seconds().map(Duration::from_secs_f64)
        } else {
            None
        }
    }

    fn reschedule(&mut self) {
        self.next_beat = self.beat_period().map(|period| Instant::now() + period);
    }

    fn execute(&mut self) {
        loop {
            let input = match self.next_beat {
                Some(deadline) => match self.receiver.recv_deadline(deadline) {
                    Ok(input) => input,
                    Err(RecvTimeoutError::Timeout) => {
                        (self.tick_fn)();
                        // Schedule from the missed deadline, not from now, so
                        // that beats don't drift later and later.
                        self.next_beat = self.beat_period().map(|period| deadline + period);
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match self.receiver.recv() {
                    Ok(input) => input,
                    Err(_) => break,
                },
            };
            match input {
                MetronomeInput::Start => {
                    self.is_started = true;
                    self.reschedule();
                }
                MetronomeInput::Stop => {
                    self.is_started = false;
                    self.reschedule();
                }
                MetronomeInput::SetRate(rate) => {
                    self.rate = rate;
                    self.reschedule();
                }
                MetronomeInput::Quit => break,
            }
        }
        log::debug!("MetronomeDaemon exit");
    }
}
