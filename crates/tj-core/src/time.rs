//! Fixed-offset wall clock and human-readable time formatting.
//!
//! # Design
//!
//! Every displayed time lives in one fixed UTC offset (IST, +05:30, by
//! default) regardless of the host's local zone.  The current instant comes
//! from a pluggable [`TimeSource`] so the journey engine can be driven by the
//! system clock in production and by a [`ManualTimeSource`] in tests and
//! replays:
//!
//! ```text
//! Clock::now() = source.now_utc() shifted into `offset`
//! ```
//!
//! Durations between timestamps are measured in milliseconds and converted
//! to fractional hours, which is the unit the journey model works in.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};

use crate::{TjError, TjResult};

/// A wall-clock instant carrying its display offset.
pub type Timestamp = DateTime<FixedOffset>;

/// UTC+05:30.
pub const IST_OFFSET_MINUTES: i32 = 330;

pub const MS_PER_HOUR: f64 = 3_600_000.0;

// ── TimeSource ────────────────────────────────────────────────────────────────

/// Where "now" comes from.
pub trait TimeSource {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Reads the host system clock.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock shared between clones.
///
/// Advancing one clone advances all of them, so a test can hand one copy to
/// a tracker and keep another to move time forward.
#[derive(Clone, Debug)]
pub struct ManualTimeSource {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    /// Move the clock forward by `delta`.  Saturates instead of overflowing.
    pub fn advance(&self, delta: TimeDelta) {
        let now = self.now.get();
        self.now.set(now.checked_add_signed(delta).unwrap_or(now));
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::zero()));
    }
}

impl TimeSource for ManualTimeSource {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// A [`TimeSource`] viewed through a fixed display offset.
#[derive(Clone, Debug)]
pub struct Clock<S: TimeSource> {
    offset: FixedOffset,
    source: S,
}

impl<S: TimeSource> Clock<S> {
    /// Build a clock displaying times at `minutes` east of UTC.
    ///
    /// Fails for offsets of a full day or more in either direction.
    pub fn from_offset_minutes(minutes: i32, source: S) -> TjResult<Self> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(TjError::TimeOffset(minutes))?;
        Ok(Self { offset, source })
    }

    #[inline]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current instant in the fixed offset.
    pub fn now(&self) -> Timestamp {
        self.source.now_utc().with_timezone(&self.offset)
    }

    /// `hour:minute:00` on the same calendar day as `reference`, where the
    /// day is taken in this clock's offset.
    pub fn at_time_of_day(&self, reference: Timestamp, hour: u32, minute: u32) -> TjResult<Timestamp> {
        let local = reference.with_timezone(&self.offset);
        let naive = local
            .date_naive()
            .and_hms_opt(hour, minute, 0)
            .ok_or_else(|| TjError::Config(format!("invalid time of day {hour:02}:{minute:02}")))?;
        self.offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| TjError::Config(format!("ambiguous local time {naive}")))
    }
}

// ── Arithmetic helpers ────────────────────────────────────────────────────────

/// Signed hours from `earlier` to `later` (negative if `later` is earlier).
pub fn hours_between(earlier: Timestamp, later: Timestamp) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MS_PER_HOUR
}

/// `ts + hours`, rounded to the millisecond.
///
/// Non-finite or unrepresentable offsets leave `ts` unchanged.
pub fn add_hours(ts: Timestamp, hours: f64) -> Timestamp {
    if !hours.is_finite() {
        return ts;
    }
    let ms = (hours * MS_PER_HOUR).round();
    if ms.abs() > i64::MAX as f64 {
        return ts;
    }
    TimeDelta::try_milliseconds(ms as i64)
        .and_then(|d| ts.checked_add_signed(d))
        .unwrap_or(ts)
}

// ── Formatting ────────────────────────────────────────────────────────────────

/// `"HH:MM"`, 24-hour, zero-padded, in the timestamp's own offset.
pub fn format_time_of_day(ts: &Timestamp) -> String {
    ts.format("%H:%M").to_string()
}

/// `"2h 15m"` for an hour or more, `"42m"` below that.
///
/// The value is rounded to whole minutes before choosing the form, so
/// `0.999` hours renders as `"1h 0m"`.  Negative and non-finite input is
/// treated as zero.
pub fn format_duration(hours: f64) -> String {
    let hours = if hours.is_finite() { hours.max(0.0) } else { 0.0 };
    let total_minutes = (hours * 60.0).round() as u64;
    let (h, m) = (total_minutes / 60, total_minutes % 60);
    if h >= 1 {
        format!("{h}h {m}m")
    } else {
        format!("{m}m")
    }
}
