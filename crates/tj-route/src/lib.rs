//! `tj-route` — the immutable route model, CSV loading, and built-in routes.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`route`]     | `Waypoint`, `Segment`, `Route`, `RouteBuilder`            |
//! | [`loader`]    | `load_route_csv`, `load_route_reader`                     |
//! | [`catalog`]   | `delhi_patna()`, `ROUTE_FACTS`                            |
//! | [`error`]     | `RouteError`, `RouteResult<T>`                            |
//!
//! # Segment model (summary)
//!
//! A route of `n` waypoints has `n - 1` segments.  Segment `i` joins
//! waypoints `i` and `i + 1`; its length is the haversine distance between
//! them.  After travelling into segment `i`, the next stops are
//!
//! ```text
//! waypoints[min(n-1, i+1) .. min(n, i+1+window)]
//! ```

pub mod catalog;
pub mod error;
pub mod loader;
pub mod route;


pub use catalog::{ROUTE_FACTS, delhi_patna};
pub use error::{RouteError, RouteResult};
pub use loader::{load_route_csv, load_route_reader};
pub use route::{Route, RouteBuilder, Segment, Waypoint};
