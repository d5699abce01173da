use thiserror::Error;

use tj_core::TjError;

/// Route construction and loading failures.
///
/// All of these are fatal at startup: progress cannot be defined without a
/// route of positive length.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("a route needs at least 2 waypoints, got {got}")]
    TooFewWaypoints { got: usize },

    #[error("waypoint {index} ({name:?}): {source}")]
    Waypoint {
        index:  usize,
        name:   String,
        #[source]
        source: TjError,
    },

    #[error("waypoint {index} ({name:?}) has the same coordinates as the one before it")]
    DuplicateConsecutive { index: usize, name: String },

    #[error("route has zero total length")]
    ZeroLength,

    #[error("route parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RouteResult<T> = Result<T, RouteError>;
