use thiserror::Error;

use tj_core::TjError;
use tj_journey::JourneyError;
use tj_route::RouteError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker configuration error: {0}")]
    Journey(#[from] JourneyError),

    #[error("clock error: {0}")]
    Core(#[from] TjError),

    #[error("route error: {0}")]
    Route(#[from] RouteError),

    #[error("clock offset {clock_minutes} min does not match configured tz_offset_minutes {config_minutes}")]
    OffsetMismatch { clock_minutes: i32, config_minutes: i32 },
}

pub type TrackerResult<T> = Result<T, TrackerError>;
