//! Derived journey state.

use tj_core::{GeoPoint, Speed, Timestamp, format_duration};

/// Remaining distance below which the train counts as arrived.
pub const ARRIVAL_EPSILON_KM: f64 = 1e-6;

/// A stop ahead of the train, with its straight-line distance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UpcomingStop {
    /// Position of the waypoint in the route.
    pub index:       usize,
    pub name:        String,
    pub point:       GeoPoint,
    /// Great-circle distance from the current position.  Not the distance
    /// along the track.
    pub distance_km: f64,
}

/// The journey at one instant.
///
/// Recomputed in full from `(route, departure, now, speed)` on every tick or
/// speed change; never patched in place and never persisted.
///
/// Invariants:
/// - `0 ≤ traveled_km ≤ total_km`
/// - `traveled_km + remaining_km == total_km` (within float epsilon)
/// - `progress_pct ≤ 100`
/// - `current_segment_index ≤ route.len() - 2`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct JourneyState {
    pub departure: Timestamp,
    pub now:       Timestamp,
    pub speed:     Speed,

    pub total_km:     f64,
    pub traveled_km:  f64,
    pub remaining_km: f64,

    /// Hours left at the current speed.
    pub eta_hours: f64,
    pub eta:       Timestamp,

    /// `round(traveled / total * 100)`.
    pub progress_pct: u8,

    pub current_point:         GeoPoint,
    pub current_segment_index: usize,

    /// At most `upcoming_window` stops, starting after the current segment.
    pub upcoming: Vec<UpcomingStop>,
}

impl JourneyState {
    /// `true` once the whole route has been covered.
    pub fn is_arrived(&self) -> bool {
        self.remaining_km <= ARRIVAL_EPSILON_KM
    }

    /// `true` while the clock is still before departure.
    pub fn is_before_departure(&self) -> bool {
        self.now < self.departure
    }

    /// Remaining travel time, e.g. `"3h 20m"`.
    pub fn remaining_duration(&self) -> String {
        format_duration(self.eta_hours)
    }
}
