use thiserror::Error;

use tj_core::TjError;
use tj_route::RouteError;

#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("journey configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] TjError),

    #[error("route error: {0}")]
    Route(#[from] RouteError),
}

pub type JourneyResult<T> = Result<T, JourneyError>;
