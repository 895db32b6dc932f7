//! Zoey's Golf headless demo
//!
//! `zoey-golf [seed] [seconds]` plays a session with the built-in autopilot
//! at a fixed 60 Hz step and prints a JSON summary when done.
//!
//! Optional environment:
//! - `ZOEY_GOLF_TUNING`: path to a tuning JSON file
//! - `ZOEY_GOLF_RECORDS`: path to the records file to load and update

use std::str::FromStr;

use zoey_golf::consts::SIM_DT;
use zoey_golf::feedback::{FeedbackMixer, LogSink};
use zoey_golf::records::{BestRecords, apply_events};
use zoey_golf::sim::{GameEvent, GameState, TickInput, tick};
use zoey_golf::tuning::Tuning;

const DEFAULT_SEED: u64 = 2024;
const DEFAULT_SECONDS: f32 = 300.0;

/// Counters gathered while the session runs
#[derive(Debug, Default)]
struct RunStats {
    collected: u32,
    deposited: u32,
    hits: u32,
    levels_cleared: u32,
    game_overs: u32,
}

impl RunStats {
    fn observe(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Collect | GameEvent::BonusCollect => self.collected += 1,
                GameEvent::Deposit { count } => self.deposited += count,
                GameEvent::Hit { .. } => self.hits += 1,
                GameEvent::LevelComplete { .. } => self.levels_cleared += 1,
                GameEvent::GameOver { .. } => self.game_overs += 1,
            }
        }
    }
}

fn parse_arg<T>(arg: Option<String>, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match arg {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {name} {raw:?}, using {default}");
            default
        }),
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = parse_arg(args.next(), "seed", DEFAULT_SEED);
    let seconds = parse_arg(args.next(), "seconds", DEFAULT_SECONDS).max(0.0);

    let tuning = std::env::var("ZOEY_GOLF_TUNING")
        .map(Tuning::load)
        .unwrap_or_default();
    let records_path = std::env::var("ZOEY_GOLF_RECORDS").ok();
    let mut records = records_path
        .as_deref()
        .map(BestRecords::load)
        .unwrap_or_default();

    log::info!("Zoey's Golf demo: seed {seed}, {seconds:.0}s of play");

    let mut state = GameState::with_tuning(seed, tuning);
    let mut feedback = FeedbackMixer::new(LogSink);
    let mut stats = RunStats::default();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let steps = (seconds / SIM_DT).round() as u64;
    for _ in 0..steps {
        tick(&mut state, &input, SIM_DT);
        let events = state.drain_events();
        if events.is_empty() {
            continue;
        }
        stats.observe(&events);
        feedback.dispatch(&events);
        apply_events(&mut records, &events);
    }

    if let Some(path) = records_path.as_deref() {
        records.save(path);
    }

    let summary = serde_json::json!({
        "seed": state.seed(),
        "simulatedSecs": seconds,
        "level": state.level,
        "phase": format!("{:?}", state.phase),
        "levelsCleared": stats.levels_cleared,
        "gameOvers": stats.game_overs,
        "collected": stats.collected,
        "deposited": stats.deposited,
        "hits": stats.hits,
        "retries": state.retries,
        "lastGeneration": state.generation,
        "records": records,
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(err) => log::error!("Failed to render summary: {err}"),
    }
}
