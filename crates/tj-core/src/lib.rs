//! `tj-core` — foundational types for the `train_journey` workspace.
//!
//! This crate is a dependency of every other `tj-*` crate.  It has no `tj-*`
//! dependencies and few external ones (`chrono`, `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`geo`]         | `GeoPoint`, `BoundingBox`, haversine distance             |
//! | [`polyline`]    | `Polyline`, `route_length_km`, `interpolate`              |
//! | [`time`]        | `TimeSource`, `Clock`, time-of-day / duration formatting  |
//! | [`speed`]       | `Speed` (clamped km/h), `parse_speed`, `SpeedChange`      |
//! | [`error`]       | `TjError`, `TjResult`, `SpeedError`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.       |
//! |         | `Speed` is `Serialize` only: it is built through the clamp.|

pub mod error;
pub mod geo;
pub mod polyline;
pub mod speed;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SpeedError, TjError, TjResult};
pub use geo::{BoundingBox, GeoPoint, distance_km};
pub use polyline::{Interpolated, Polyline, interpolate, route_length_km};
pub use speed::{Speed, SpeedChange, parse_speed};
pub use time::{
    Clock, ManualTimeSource, SystemTimeSource, TimeSource, Timestamp, format_duration,
    format_time_of_day,
};
