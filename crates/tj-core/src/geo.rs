//! Geographic coordinate type and great-circle distance.
//!
//! `GeoPoint` uses `f64` latitude/longitude in degrees.  Routes span hundreds
//! of kilometres and positions are interpolated from fractional progress, so
//! single precision would show visible marker jitter at inter-city scale.

use std::fmt;

use crate::{TjError, TjResult};

/// Mean Earth radius in kilometres used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in kilometres.
    ///
    /// Symmetric and non-negative; zero only when both points coincide (up to
    /// floating-point precision).
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
        // `a` can round a hair above 1.0 for near-antipodal points.
        let a = a.clamp(0.0, 1.0);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Linear blend in latitude/longitude: `t = 0` is `self`, `t = 1` is
    /// `other`.
    ///
    /// A planar approximation of the geodesic; good enough between adjacent
    /// stations a few hundred kilometres apart.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }

    /// `true` if both components are finite and within WGS-84 bounds.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// `Ok(self)` if [`is_valid`][Self::is_valid], else
    /// [`TjError::InvalidCoordinate`].
    pub fn validate(self) -> TjResult<GeoPoint> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(TjError::InvalidCoordinate { lat: self.lat, lon: self.lon })
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Free-function form of [`GeoPoint::distance_km`].
#[inline]
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    a.distance_km(b)
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned lat/lon rectangle.
///
/// Used by map collaborators to fit a route into view and to decide whether
/// the marker has drifted far enough from the centre to warrant a pan.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub south: f64,
    pub west:  f64,
    pub north: f64,
    pub east:  f64,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = BoundingBox {
            south: first.lat,
            west:  first.lon,
            north: first.lat,
            east:  first.lon,
        };
        Some(iter.fold(init, |b, p| BoundingBox {
            south: b.south.min(p.lat),
            west:  b.west.min(p.lon),
            north: b.north.max(p.lat),
            east:  b.east.max(p.lon),
        }))
    }

    /// Box of the given half-extent (degrees) centred on `center`.
    pub fn around(center: GeoPoint, half_lat: f64, half_lon: f64) -> Self {
        BoundingBox {
            south: center.lat - half_lat,
            west:  center.lon - half_lon,
            north: center.lat + half_lat,
            east:  center.lon + half_lon,
        }
    }

    /// Grow (positive `ratio`) or shrink (negative `ratio`) each side by
    /// `ratio` times the box's extent along that axis.
    ///
    /// `pad(-0.3)` keeps the central 40 % of the box.
    pub fn pad(self, ratio: f64) -> Self {
        let d_lat = (self.north - self.south) * ratio;
        let d_lon = (self.east - self.west) * ratio;
        BoundingBox {
            south: self.south - d_lat,
            west:  self.west - d_lon,
            north: self.north + d_lat,
            east:  self.east + d_lon,
        }
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.south..=self.north).contains(&p.lat) && (self.west..=self.east).contains(&p.lon)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.south + self.north) * 0.5, (self.west + self.east) * 0.5)
    }

    /// Half-extents `(lat, lon)` in degrees.
    pub fn half_extent(&self) -> (f64, f64) {
        ((self.north - self.south) * 0.5, (self.east - self.west) * 0.5)
    }
}
