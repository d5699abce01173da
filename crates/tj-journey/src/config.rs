//! Journey configuration.

use tj_core::Speed;
use tj_core::time::IST_OFFSET_MINUTES;

use crate::{JourneyError, JourneyResult};

/// Top-level journey configuration.
///
/// Typically loaded from a JSON file by the application crate (with the
/// `serde` feature) and passed to the tracker.  Missing fields fall back to
/// [`Default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct JourneyConfig {
    /// Display offset east of UTC in minutes.  Default: 330 (IST).
    pub tz_offset_minutes: i32,

    /// Departure time of day, in the display offset.  Default: 06:00.
    pub departure_hour:   u32,
    pub departure_minute: u32,

    /// Speed used when no override is supplied.  Clamped to `[10, 120]`.
    pub default_speed_kmph: f64,

    /// Seconds between journey recomputes.  Default: 15.
    pub tick_interval_secs: u64,

    /// Seconds between fact rotations.  Default: 15.
    pub fact_interval_secs: u64,

    /// Maximum number of upcoming stops reported.  Default: 4.
    pub upcoming_window: usize,

    /// Minimum seconds between map pans.  Consumed by map collaborators,
    /// not by the journey model.  Default: 5.
    pub pan_throttle_secs: u64,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            tz_offset_minutes:  IST_OFFSET_MINUTES,
            departure_hour:     6,
            departure_minute:   0,
            default_speed_kmph: Speed::DEFAULT.kmph(),
            tick_interval_secs: 15,
            fact_interval_secs: 15,
            upcoming_window:    4,
            pan_throttle_secs:  5,
        }
    }
}

impl JourneyConfig {
    /// Reject values that would make the tracker misbehave.
    pub fn validate(&self) -> JourneyResult<()> {
        if self.tz_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(config_err(format!(
                "tz_offset_minutes {} must be within ±1439",
                self.tz_offset_minutes
            )));
        }
        if self.departure_hour >= 24 || self.departure_minute >= 60 {
            return Err(config_err(format!(
                "departure time {:02}:{:02} is not a valid time of day",
                self.departure_hour, self.departure_minute
            )));
        }
        if !self.default_speed_kmph.is_finite() {
            return Err(config_err("default_speed_kmph must be finite".into()));
        }
        if self.tick_interval_secs == 0 {
            return Err(config_err("tick_interval_secs must be > 0".into()));
        }
        if self.fact_interval_secs == 0 {
            return Err(config_err("fact_interval_secs must be > 0".into()));
        }
        if self.upcoming_window == 0 {
            return Err(config_err("upcoming_window must be > 0".into()));
        }
        Ok(())
    }

    /// The configured default speed, clamped into range.
    pub fn default_speed(&self) -> Speed {
        Speed::clamped(self.default_speed_kmph).unwrap_or(Speed::DEFAULT)
    }
}

fn config_err(msg: String) -> JourneyError {
    JourneyError::Config(msg)
}
