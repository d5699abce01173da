//! The journey model: a pure function of route, departure, clock, and speed.

use std::sync::Arc;

use tj_core::time::{add_hours, hours_between};
use tj_core::{Speed, SpeedChange, Timestamp, parse_speed};
use tj_route::Route;

use crate::{JourneyState, UpcomingStop};

/// Derive the full journey state.
///
/// ```text
/// elapsed_h   = max(0, now - departure)
/// traveled_km = clamp(elapsed_h * speed, 0, total_km)
/// remaining   = total_km - traveled_km
/// eta_h       = remaining / max(1, speed)
/// progress    = round(traveled / total * 100)
/// ```
///
/// The clock never runs backward relative to departure: any `now` before
/// `departure` yields zero progress at the first waypoint.
pub fn compute_state(
    route:     &Route,
    departure: Timestamp,
    now:       Timestamp,
    speed:     Speed,
    window:    usize,
) -> JourneyState {
    let kmph = speed.kmph();
    let elapsed_hours = hours_between(departure, now).max(0.0);
    let total_km = route.total_km();

    let traveled_km = (elapsed_hours * kmph).clamp(0.0, total_km);
    let remaining_km = total_km - traveled_km;
    let eta_hours = remaining_km / kmph.max(1.0);
    let eta = add_hours(now, eta_hours);
    let progress_pct = (traveled_km / total_km * 100.0).round().clamp(0.0, 100.0) as u8;

    let at = route.locate(traveled_km);

    let upcoming = route
        .upcoming_range(at.segment_index, window)
        .filter_map(|index| {
            route.waypoint(index).map(|wp| UpcomingStop {
                index,
                name:        wp.name.clone(),
                point:       wp.point,
                distance_km: at.point.distance_km(wp.point),
            })
        })
        .collect();

    JourneyState {
        departure,
        now,
        speed,
        total_km,
        traveled_km,
        remaining_km,
        eta_hours,
        eta,
        progress_pct,
        current_point: at.point,
        current_segment_index: at.segment_index,
        upcoming,
    }
}

/// Resolve an optional external speed override (query value, CLI flag).
///
/// Unparseable or non-finite input keeps `default`; numbers are clamped.
pub fn resolve_initial_speed(override_input: Option<&str>, default: Speed) -> Speed {
    match override_input.map(parse_speed) {
        None => default,
        Some(Ok(speed)) => speed,
        Some(Err(e)) => {
            log::warn!("ignoring speed override: {e}; keeping {default}");
            default
        }
    }
}

/// Holds the journey's genuine inputs and derives [`JourneyState`] on
/// demand.
///
/// The only mutable input is the speed, and every mutation goes through
/// validation and clamping.
#[derive(Clone, Debug)]
pub struct JourneyModel {
    route:     Arc<Route>,
    departure: Timestamp,
    speed:     Speed,
    window:    usize,
}

impl JourneyModel {
    /// Default upcoming-stop window.
    pub const DEFAULT_WINDOW: usize = 4;

    pub fn new(route: Arc<Route>, departure: Timestamp, speed: Speed) -> Self {
        Self { route, departure, speed, window: Self::DEFAULT_WINDOW }
    }

    /// Override the number of upcoming stops reported.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    pub fn departure(&self) -> Timestamp {
        self.departure
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// The journey as it stands at `now`.
    pub fn state_at(&self, now: Timestamp) -> JourneyState {
        let state = compute_state(&self.route, self.departure, now, self.speed, self.window);
        log::debug!(
            "journey at {}: {:.1}/{:.1} km ({}%), segment {}, speed {}",
            now.format("%H:%M:%S"),
            state.traveled_km,
            state.total_km,
            state.progress_pct,
            state.current_segment_index,
            self.speed
        );
        state
    }

    /// Request a numeric speed.  Non-finite values are rejected; finite
    /// values are clamped to `[10, 120]`.
    pub fn set_speed(&mut self, kmph: f64) -> SpeedChange {
        let change = SpeedChange::from_request(kmph);
        self.commit(&change);
        change
    }

    /// Request a speed from free-form text, e.g. a prompt answer.
    ///
    /// Malformed input leaves the speed unchanged.
    pub fn apply_speed_input(&mut self, input: &str) -> SpeedChange {
        let change = SpeedChange::from_input(input);
        self.commit(&change);
        change
    }

    fn commit(&mut self, change: &SpeedChange) {
        match change {
            SpeedChange::Applied(s) => {
                log::info!("speed set to {s}");
                self.speed = *s;
            }
            SpeedChange::Clamped { requested, applied } => {
                log::info!("speed request {requested} km/h clamped to {applied}");
                self.speed = *applied;
            }
            SpeedChange::Rejected(e) => {
                log::warn!("speed change rejected: {e}; keeping {}", self.speed);
            }
        }
    }
}
