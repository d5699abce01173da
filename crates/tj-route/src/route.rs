//! The immutable route model.
//!
//! A `Route` is validated once at construction and never mutated.  Segment
//! lengths are computed up front into a [`Polyline`] so that every journey
//! recompute is a table walk rather than a fresh round of haversines.

use std::fmt;
use std::ops::Range;

use tj_core::{GeoPoint, Interpolated, Polyline};

use crate::{RouteError, RouteResult};

// ── Waypoint ──────────────────────────────────────────────────────────────────

/// A named stop on the route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub name:  String,
    pub point: GeoPoint,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { name: name.into(), point: GeoPoint::new(lat, lon) }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.point)
    }
}

// ── Segment ───────────────────────────────────────────────────────────────────

/// One consecutive waypoint pair and its great-circle length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment<'a> {
    pub index:     usize,
    pub from:      &'a Waypoint,
    pub to:        &'a Waypoint,
    pub length_km: f64,
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered, validated list of at least two waypoints.
///
/// Invariants established by [`Route::new`]:
/// - `waypoints.len() >= 2`
/// - every coordinate is finite and within WGS-84 bounds
/// - no two consecutive waypoints share coordinates
/// - `total_km() > 0`
#[derive(Clone, Debug)]
pub struct Route {
    name:      String,
    waypoints: Vec<Waypoint>,
    line:      Polyline,
}

impl Route {
    /// Validate `waypoints` and precompute segment lengths.
    pub fn new(name: impl Into<String>, waypoints: Vec<Waypoint>) -> RouteResult<Route> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints { got: waypoints.len() });
        }

        for (index, wp) in waypoints.iter().enumerate() {
            wp.point.validate().map_err(|source| RouteError::Waypoint {
                index,
                name: wp.name.clone(),
                source,
            })?;
        }

        for (i, pair) in waypoints.windows(2).enumerate() {
            if pair[0].point == pair[1].point {
                return Err(RouteError::DuplicateConsecutive {
                    index: i + 1,
                    name:  pair[1].name.clone(),
                });
            }
        }

        let line = Polyline::new(waypoints.iter().map(|w| w.point).collect());
        if line.length_km() <= 0.0 {
            return Err(RouteError::ZeroLength);
        }

        Ok(Route { name: name.into(), waypoints, line })
    }

    /// Display name, e.g. `"Delhi → Patna"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Number of waypoints (always ≥ 2).
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint coordinates in route order.
    pub fn points(&self) -> &[GeoPoint] {
        self.line.points()
    }

    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn last(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    pub fn start(&self) -> GeoPoint {
        self.first().point
    }

    pub fn end(&self) -> GeoPoint {
        self.last().point
    }

    /// Total length in km (always > 0).
    pub fn total_km(&self) -> f64 {
        self.line.length_km()
    }

    pub fn segment_count(&self) -> usize {
        self.line.segment_count()
    }

    /// Iterator over all `len() - 1` segments in route order.
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> + '_ {
        self.waypoints.windows(2).enumerate().map(|(index, pair)| Segment {
            index,
            from:      &pair[0],
            to:        &pair[1],
            length_km: self.line.segment_length_km(index).unwrap_or(0.0),
        })
    }

    /// Position after `traveled_km` along the route (clamped to the route).
    pub fn locate(&self, traveled_km: f64) -> Interpolated {
        self.line.interpolate(traveled_km).unwrap_or(Interpolated {
            point:         self.start(),
            segment_index: 0,
        })
    }

    /// Indices of the waypoints after segment `segment_index`: a window of
    /// at most `window` stops beginning at `min(len - 1, segment_index + 1)`.
    pub fn upcoming_range(&self, segment_index: usize, window: usize) -> Range<usize> {
        let n = self.waypoints.len();
        let start = segment_index.saturating_add(1).min(n - 1);
        let end = start.saturating_add(window).min(n);
        start..end
    }

    /// The waypoints in [`upcoming_range`][Self::upcoming_range].
    pub fn upcoming(&self, segment_index: usize, window: usize) -> &[Waypoint] {
        &self.waypoints[self.upcoming_range(segment_index, window)]
    }
}

// ── RouteBuilder ──────────────────────────────────────────────────────────────

/// Fluent helper for building a [`Route`] in code.
///
/// ```rust,ignore
/// let route = RouteBuilder::new("Delhi → Patna")
///     .stop("New Delhi", 28.6430, 77.2194)
///     .stop("Patna Jn",  25.6027, 85.1375)
///     .build()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct RouteBuilder {
    name:      String,
    waypoints: Vec<Waypoint>,
}

impl RouteBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), waypoints: Vec::new() }
    }

    pub fn stop(mut self, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.waypoints.push(Waypoint::new(name, lat, lon));
        self
    }

    pub fn waypoint(mut self, waypoint: Waypoint) -> Self {
        self.waypoints.push(waypoint);
        self
    }

    pub fn build(self) -> RouteResult<Route> {
        Route::new(self.name, self.waypoints)
    }
}
