//! `tj-journey` — derives the simulated train's position from wall-clock time.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`model`]     | `compute_state`, `JourneyModel`, `resolve_initial_speed`        |
//! | [`state`]     | `JourneyState`, `UpcomingStop`                                  |
//! | [`snapshot`]  | `MapSnapshot` — read-only view for map collaborators            |
//! | [`facts`]     | `FactRotator` — display-only trivia index                       |
//! | [`config`]    | `JourneyConfig`                                                 |
//! | [`error`]     | `JourneyError`, `JourneyResult<T>`                              |
//!
//! # Movement model (constant speed)
//!
//! The train never reports a position.  It is assumed to leave the first
//! waypoint at `departure` and run at a constant `speed`:
//!
//! 1. `traveled_km = clamp((now - departure) * speed, 0, total_km)`.
//! 2. `Route::locate(traveled_km)` finds the segment and interpolates the
//!    marker position linearly in lat/lon within it.
//! 3. The stops after that segment (at most `window`) are reported with
//!    their straight-line distance from the marker.
//!
//! Changing the speed re-derives the whole state from departure, so the
//! marker may jump; there is no integrated odometer.

pub mod config;
pub mod error;
pub mod facts;
pub mod model;
pub mod snapshot;
pub mod state;


pub use config::JourneyConfig;
pub use error::{JourneyError, JourneyResult};
pub use facts::FactRotator;
pub use model::{JourneyModel, compute_state, resolve_initial_speed};
pub use snapshot::MapSnapshot;
pub use state::{JourneyState, UpcomingStop};
