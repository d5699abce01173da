//! Simulated train speed.
//!
//! `Speed` can only be constructed inside `[MIN_KMPH, MAX_KMPH]`, so every
//! mutation site clamps by construction.  Free-form user input goes through
//! [`parse_speed`], which rejects anything that is not a finite number.

use std::fmt;

use crate::SpeedError;

/// Simulated speed in km/h, always within `[Speed::MIN_KMPH, Speed::MAX_KMPH]`.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Speed(f64);

impl Speed {
    pub const MIN_KMPH: f64 = 10.0;
    pub const MAX_KMPH: f64 = 120.0;

    /// 65 km/h — average speed assumption when nothing overrides it.
    pub const DEFAULT: Speed = Speed(65.0);

    /// Clamp `kmph` into range.  `None` for NaN or infinities.
    pub fn clamped(kmph: f64) -> Option<Speed> {
        kmph.is_finite()
            .then(|| Speed(kmph.clamp(Self::MIN_KMPH, Self::MAX_KMPH)))
    }

    #[inline]
    pub fn kmph(self) -> f64 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km/h", self.0)
    }
}

/// Parse free-form text (query value, prompt answer) into a clamped speed.
///
/// Surrounding whitespace is ignored.  Empty, non-numeric and non-finite
/// input is an error; finite out-of-range numbers are clamped.
pub fn parse_speed(input: &str) -> Result<Speed, SpeedError> {
    parse_kmph(input).map(|v| Speed(v.clamp(Speed::MIN_KMPH, Speed::MAX_KMPH)))
}

fn parse_kmph(input: &str) -> Result<f64, SpeedError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SpeedError::Empty);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| SpeedError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(SpeedError::NotFinite(trimmed.to_string()));
    }
    Ok(value)
}

/// Outcome of a speed-change request.
#[derive(Clone, Debug, PartialEq)]
pub enum SpeedChange {
    /// The requested value was in range and is now the speed.
    Applied(Speed),
    /// The request was out of range; `applied` is the clamped value in use.
    Clamped { requested: f64, applied: Speed },
    /// The request was discarded; the previous speed is still in use.
    Rejected(SpeedError),
}

impl SpeedChange {
    /// Classify a raw numeric request.
    pub fn from_request(requested: f64) -> SpeedChange {
        match Speed::clamped(requested) {
            None => SpeedChange::Rejected(SpeedError::NotFinite(requested.to_string())),
            Some(s) if s.kmph() == requested => SpeedChange::Applied(s),
            Some(applied) => SpeedChange::Clamped { requested, applied },
        }
    }

    /// Classify a free-form text request.
    pub fn from_input(input: &str) -> SpeedChange {
        match parse_kmph(input) {
            Ok(value) => Self::from_request(value),
            Err(e) => SpeedChange::Rejected(e),
        }
    }

    /// The speed now in effect, or `None` if the request was rejected.
    pub fn speed(&self) -> Option<Speed> {
        match self {
            SpeedChange::Applied(s) | SpeedChange::Clamped { applied: s, .. } => Some(*s),
            SpeedChange::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SpeedChange::Rejected(_))
    }
}
