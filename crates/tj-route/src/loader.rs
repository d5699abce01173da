//! CSV route loader.
//!
//! # CSV format
//!
//! One row per waypoint, in travel order:
//!
//! ```csv
//! name,lat,lon
//! New Delhi,28.6430,77.2194
//! Kanpur Central,26.4540,80.3506
//! Patna Jn,25.6027,85.1375
//! ```
//!
//! Coordinates are decimal degrees.  The loaded waypoints go through the
//! same validation as [`Route::new`], so a file with fewer than two rows or
//! repeated consecutive coordinates is rejected.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::route::{Route, Waypoint};
use crate::RouteError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WaypointRecord {
    name: String,
    lat:  f64,
    lon:  f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a route from a CSV file.
///
/// The route is named `"<first> → <last>"` after its end waypoints.
pub fn load_route_csv(path: &Path) -> Result<Route, RouteError> {
    let file = std::fs::File::open(path).map_err(RouteError::Io)?;
    let route = load_route_reader(file)?;
    log::info!(
        "loaded route {:?} from {}: {} waypoints, {:.1} km",
        route.name(),
        path.display(),
        route.len(),
        route.total_km()
    );
    Ok(route)
}

/// Like [`load_route_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding route tables.
pub fn load_route_reader<R: Read>(reader: R) -> Result<Route, RouteError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut waypoints = Vec::new();
    for (row, result) in csv_reader.deserialize::<WaypointRecord>().enumerate() {
        let rec = result.map_err(|e| RouteError::Parse(format!("row {}: {e}", row + 1)))?;
        if rec.name.is_empty() {
            return Err(RouteError::Parse(format!("row {}: empty waypoint name", row + 1)));
        }
        waypoints.push(Waypoint::new(rec.name, rec.lat, rec.lon));
    }

    let name = match (waypoints.first(), waypoints.last()) {
        (Some(a), Some(b)) => format!("{} → {}", a.name, b.name),
        _ => String::new(),
    };
    Route::new(name, waypoints)
}
