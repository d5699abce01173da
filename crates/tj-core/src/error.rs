//! Core error types.
//!
//! Sub-crates define their own error enums and wrap `TjError` as one variant
//! via `#[from]`.

use thiserror::Error;

/// The top-level error type for `tj-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum TjError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("time offset of {0} minutes is out of range")]
    TimeOffset(i32),
}

/// Shorthand result type for all `tj-*` crates.
pub type TjResult<T> = Result<T, TjError>;

/// Why a speed input was discarded.
///
/// Never fatal: the caller keeps the previous speed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpeedError {
    #[error("speed input is empty")]
    Empty,

    #[error("speed input {0:?} is not a number")]
    NotANumber(String),

    #[error("speed input {0:?} is not finite")]
    NotFinite(String),
}
