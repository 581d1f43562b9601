// Copyright (c) 2024 Mike Tsao

//! The `dj-booth` demo runs a metronome-driven tempo service and plays a
//! script of intents against it, printing what the service reports.
//!
//! ```text
//! cargo run --example dj-booth -- start up up rate=120 down stop
//! cargo run --example dj-booth -- --rate-step 5 --clamp --save-settings tempo.json
//! cargo run --example dj-booth -- --settings tempo.json start down down stop
//! ```

use anyhow::anyhow;
use beatkeeper::prelude::*;
use beatkeeper_services::prelude::*;
use clap::Parser;
use crossbeam::channel::Select;
use std::{path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[clap(author, about, long_about = None)]
struct Args {
    /// Intents to play, in order: start, stop, up, down, or rate=<bpm>
    #[clap(value_parser = parse_intent)]
    intents: Vec<Intent>,

    /// How long to listen after each intent, in milliseconds
    #[clap(short = 'w', long, default_value_t = 1500)]
    dwell: u64,

    /// Load tempo settings from this JSON file
    #[clap(short = 's', long)]
    settings: Option<PathBuf>,

    /// Rate to jump to on start
    #[clap(long)]
    default_rate: Option<i32>,

    /// How far up and down move the rate
    #[clap(long)]
    rate_step: Option<i32>,

    /// Treat negative rates as zero
    #[clap(long)]
    clamp: bool,

    /// Write the settings in use to this JSON file and exit. Only writes if
    /// the settings changed since they were loaded.
    #[clap(long)]
    save_settings: Option<PathBuf>,
}

fn parse_intent(s: &str) -> Result<Intent, String> {
    match s {
        "start" => Ok(Intent::Start),
        "stop" => Ok(Intent::Stop),
        "up" => Ok(Intent::Increase),
        "down" => Ok(Intent::Decrease),
        _ => match s.strip_prefix("rate=") {
            Some(rate) => rate
                .parse::<i32>()
                .map(|rate| Intent::SetRate(Bpm(rate)))
                .map_err(|e| format!("bad rate in {s}: {e}")),
            None => Err(format!("unrecognized intent {s}")),
        },
    }
}

fn describe(event: &TempoServiceEvent) -> String {
    match event {
        TempoServiceEvent::RateChanged(rate) => format!("rate: {}", RateReadout::from(*rate)),
        TempoServiceEvent::Beat => "beat".to_string(),
        TempoServiceEvent::AffordancesChanged {
            start_enabled,
            stop_enabled,
        } => format!("start button enabled: {start_enabled}, stop button enabled: {stop_enabled}"),
        TempoServiceEvent::IntentFailed(intent, message) => format!("{intent} failed: {message}"),
        TempoServiceEvent::Quit => "quit".to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match args.settings {
        Some(path) => TempoSettings::load(&path)?,
        None => TempoSettings::default(),
    };
    if let Some(rate) = args.default_rate {
        settings.set_default_rate(Bpm(rate));
    }
    if let Some(step) = args.rate_step {
        settings.set_rate_step(Bpm(step))?;
    }
    if args.clamp {
        settings.set_rate_policy(RatePolicy::ClampToZero);
    }
    if let Some(path) = args.save_settings {
        if settings.has_been_saved() {
            println!("Settings unchanged; not writing {path:?}");
        } else {
            settings.save(&path)?;
            println!("Saved settings to {path:?}");
        }
        return Ok(());
    }

    let service = TempoService::new_with(settings);
    let dwell = Duration::from_millis(args.dwell);
    for intent in args.intents {
        println!("> {intent:?}");
        service.send_input(TempoServiceInput::Intent(intent));

        let deadline = crossbeam::channel::after(dwell);
        loop {
            let mut sel = Select::new();
            let event_index = sel.recv(service.receiver());
            let deadline_index = sel.recv(&deadline);
            let operation = sel.select();
            match operation.index() {
                i if i == event_index => {
                    let event = TempoService::recv_operation(operation, service.receiver())
                        .map_err(|e| anyhow!("tempo service went away: {e}"))?;
                    println!("  {}", describe(&event));
                }
                i if i == deadline_index => {
                    let _ = operation.recv(&deadline);
                    break;
                }
                _ => unreachable!(),
            }
        }
    }

    service.send_input(TempoServiceInput::Quit);
    Ok(())
}
