//! delhi_patna — live dashboard for the simulated Delhi → Patna train.
//!
//! The train's position is derived from the wall clock: it leaves Delhi at
//! 06:00 IST and runs at a constant speed until Patna.  Type a number and
//! press Enter to change the speed (10–120 km/h).
//!
//! ```text
//! delhi_patna [--speed <kmph>] [--config <file.json>] [--route <file.csv>]
//!             [--ticks <n>] [--json] [--replay <hours>]
//! ```
//!
//! `--replay` drives a manual clock from today's departure instead of
//! sleeping, which previews a whole journey in a fraction of a second.
//! `RUST_LOG` controls log verbosity (default `info`, on stderr).

mod map;

#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{TimeDelta, Utc};

use tj_core::time::{add_hours, hours_between};
use tj_core::{
    Clock, ManualTimeSource, SpeedChange, SystemTimeSource, TimeSource, format_duration,
    format_time_of_day,
};
use tj_journey::{FactRotator, JourneyConfig, JourneyState};
use tj_route::{ROUTE_FACTS, Route, delhi_patna, load_route_csv};
use tj_ticker::{JourneyObserver, JourneyTracker, TrackerBuilder};

use map::TerminalMap;

type Tracker<S> = JourneyTracker<S, TerminalMap<S>>;

// ── Constants ─────────────────────────────────────────────────────────────────

const PROGRESS_BAR_WIDTH: usize = 40;

const USAGE: &str = "\
usage: delhi_patna [options]

  --speed <kmph>       initial speed (clamped to 10..=120, default from config)
  --config <path>      JSON journey config
  --route <path>       CSV route (name,lat,lon per row), default Delhi → Patna
  --ticks <n>          stop after n journey ticks
  --json               print state + map snapshot as JSON lines
  --replay <hours>     simulate <hours> from departure without sleeping
  -h, --help           show this message";

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Args {
    speed:        Option<String>,
    config:       Option<PathBuf>,
    route:        Option<PathBuf>,
    ticks:        Option<u64>,
    json:         bool,
    replay_hours: Option<f64>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);

    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--speed" => args.speed = Some(value(&mut it, &flag)?),
            "--config" => args.config = Some(value(&mut it, &flag)?.into()),
            "--route" => args.route = Some(value(&mut it, &flag)?.into()),
            "--ticks" => {
                let raw = value(&mut it, &flag)?;
                args.ticks = Some(raw.parse().with_context(|| format!("--ticks {raw:?}"))?);
            }
            "--json" => args.json = true,
            "--replay" => {
                let raw = value(&mut it, &flag)?;
                let hours: f64 = raw.parse().with_context(|| format!("--replay {raw:?}"))?;
                if !hours.is_finite() || hours <= 0.0 {
                    bail!("--replay needs a positive number of hours, got {raw:?}");
                }
                args.replay_hours = Some(hours);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?}\n\n{USAGE}"),
        }
    }
    Ok(args)
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    it.next().with_context(|| format!("{flag} needs a value"))
}

fn load_config(path: Option<&PathBuf>) -> Result<JourneyConfig> {
    let Some(path) = path else {
        return Ok(JourneyConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let config: JourneyConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn load_route(path: Option<&PathBuf>) -> Result<Route> {
    match path {
        Some(path) => load_route_csv(path).with_context(|| format!("loading route {}", path.display())),
        None => Ok(delhi_patna()?),
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// Prints the journey whenever the tracker reports something new.
struct Dashboard {
    json:  bool,
    dirty: bool,
}

impl JourneyObserver for Dashboard {
    fn on_state(&mut self, _state: &JourneyState) {
        self.dirty = true;
    }

    fn on_fact(&mut self, _fact: &str) {
        self.dirty = true;
    }

    fn on_speed_change(&mut self, change: &SpeedChange) {
        match change {
            SpeedChange::Applied(speed) => println!(">> speed set to {speed}"),
            SpeedChange::Clamped { requested, applied } => {
                println!(">> {requested} km/h is out of range, using {applied}")
            }
            SpeedChange::Rejected(err) => println!(">> ignored: {err}"),
        }
    }

    fn on_shutdown(&mut self) {
        log::info!("dashboard closed");
    }
}

impl Dashboard {
    fn render<S: TimeSource>(&mut self, tracker: &Tracker<S>) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        if self.json {
            let line = serde_json::json!({
                "state":    tracker.state(),
                "snapshot": tracker.snapshot(),
                "fact":     tracker.current_fact(),
            });
            println!("{}", serde_json::to_string(&line)?);
            return Ok(());
        }

        let route = tracker.model().route();
        let s = tracker.state();

        println!();
        println!("=== {} ===  {} ({})", route.name(), format_time_of_day(&s.now), s.now.format("UTC%:z"));
        println!("{}  {}% complete", progress_bar(s.progress_pct), s.progress_pct);
        println!("speed      {}", s.speed);
        println!("departed   {}", format_time_of_day(&s.departure));
        println!("remaining  {:.1} km to {}", s.remaining_km, route.last().name);
        if s.is_arrived() {
            println!("arrived    {}", format_time_of_day(&s.eta));
        } else {
            println!("ETA        {} (in {})", format_time_of_day(&s.eta), s.remaining_duration());
        }
        if !s.upcoming.is_empty() {
            println!("upcoming");
            for stop in &s.upcoming {
                println!("  {:<16} {:>7.1} km", stop.name, stop.distance_km);
            }
        }
        if let Some(fact) = tracker.current_fact() {
            println!("did you know? {fact}");
        }
        println!("map        {}", tracker.sink().describe());
        Ok(())
    }
}

fn progress_bar(pct: u8) -> String {
    let filled = usize::from(pct.min(100)) * PROGRESS_BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(PROGRESS_BAR_WIDTH - filled))
}

// ── Run loops ─────────────────────────────────────────────────────────────────

/// The map shares the tracker's time source so its pan throttle follows
/// journey time, live or replayed.
fn build_tracker<S: TimeSource + Clone>(
    route:  Arc<Route>,
    clock:  Clock<S>,
    config: &JourneyConfig,
    speed:  Option<&str>,
) -> Result<Tracker<S>> {
    let map = TerminalMap::new(clock.source().clone(), Duration::from_secs(config.pan_throttle_secs));
    let mut tracker = TrackerBuilder::new(route, clock, map)
        .config(config.clone())
        .speed_override(speed)
        .facts(FactRotator::new(ROUTE_FACTS.iter().copied()))
        .build()?;
    let bounds = tracker.snapshot().bounds();
    tracker.sink_mut().fit(bounds);
    Ok(tracker)
}

fn finished<S: TimeSource>(tracker: &Tracker<S>, max_ticks: Option<u64>) -> bool {
    tracker.state().is_arrived() || max_ticks.is_some_and(|n| tracker.ticks() >= n)
}

/// Forward stdin lines over a channel so the tracker never blocks on input.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Real time: sleep until the next task is due, waking early for speed input.
fn run_live(
    route:  Arc<Route>,
    config: &JourneyConfig,
    args:   &Args,
    dash:   &mut Dashboard,
) -> Result<()> {
    let clock = Clock::from_offset_minutes(config.tz_offset_minutes, SystemTimeSource)?;
    let mut tracker = build_tracker(route, clock, config, args.speed.as_deref())?;
    dash.dirty = true;
    dash.render(&tracker)?;
    if !args.json {
        println!("(type a speed in km/h and press Enter to change it)");
    }

    let input = spawn_stdin_reader();
    let mut stdin_open = true;

    while !finished(&tracker, args.ticks) {
        let Some(wait) = tracker.until_next_due() else { break };

        if stdin_open {
            match input.recv_timeout(wait) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        tracker.adjust_speed(&line, dash);
                        dash.render(&tracker)?;
                    }
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("stdin closed; speed input disabled");
                    stdin_open = false;
                    continue;
                }
            }
        } else {
            thread::sleep(wait);
        }

        tracker.pump(dash);
        dash.render(&tracker)?;
    }

    tracker.shutdown(dash);
    Ok(())
}

/// Manual clock: step from departure straight to each due instant.
fn run_replay(
    route:  Arc<Route>,
    config: &JourneyConfig,
    args:   &Args,
    hours:  f64,
    dash:   &mut Dashboard,
) -> Result<()> {
    let live = Clock::from_offset_minutes(config.tz_offset_minutes, SystemTimeSource)?;
    let departure = live.at_time_of_day(live.now(), config.departure_hour, config.departure_minute)?;
    let source = ManualTimeSource::new(departure.with_timezone(&Utc));

    let clock = Clock::from_offset_minutes(config.tz_offset_minutes, source.clone())?;
    let mut tracker = build_tracker(route, clock, config, args.speed.as_deref())?;
    dash.dirty = true;
    dash.render(&tracker)?;

    let end = add_hours(departure, hours);
    while !finished(&tracker, args.ticks) {
        let Some(wait) = tracker.until_next_due() else { break };
        source.advance(TimeDelta::from_std(wait)?);
        if tracker.clock().now() > end {
            break;
        }
        tracker.pump(dash);
        dash.render(&tracker)?;
    }

    log::info!(
        "replayed {} from departure in {} ticks",
        format_duration(hours_between(departure, tracker.clock().now())),
        tracker.ticks()
    );
    tracker.shutdown(dash);
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;
    let route = Arc::new(load_route(args.route.as_ref())?);
    log::info!(
        "route {:?}: {} stops, {:.1} km",
        route.name(),
        route.len(),
        route.total_km()
    );

    let mut dash = Dashboard { json: args.json, dirty: false };
    match args.replay_hours {
        Some(hours) => run_replay(route, &config, &args, hours, &mut dash),
        None => run_live(route, &config, &args, &mut dash),
    }
}
