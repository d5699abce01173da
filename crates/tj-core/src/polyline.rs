//! Route length and position interpolation along a polyline.
//!
//! # Lookup model
//!
//! A `Polyline` stores a cumulative-distance table alongside its points:
//!
//! ```text
//! cumulative_km[0] = 0
//! cumulative_km[i] = Σ distance(points[j], points[j+1])  for j < i
//! ```
//!
//! Segment `i` covers the half-open range `[cumulative_km[i],
//! cumulative_km[i+1])`.  The final segment is closed at the top so that a
//! distance equal to the total length lands on the last point rather than
//! falling off the end.

use crate::geo::GeoPoint;

/// Where a travelled distance lands on a polyline.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interpolated {
    pub point:         GeoPoint,
    /// Index of the segment `(points[i], points[i+1])` containing `point`.
    pub segment_index: usize,
}

/// An ordered point sequence with a precomputed cumulative-length table.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points:        Vec<GeoPoint>,
    cumulative_km: Vec<f64>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        let mut cumulative_km = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                acc += points[i - 1].distance_km(*p);
            }
            cumulative_km.push(acc);
        }
        Self { points, cumulative_km }
    }

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Total length in km; `0.0` for fewer than two points.
    #[inline]
    pub fn length_km(&self) -> f64 {
        self.cumulative_km.last().copied().unwrap_or(0.0)
    }

    /// Number of segments (`points - 1`, or 0).
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Great-circle length of segment `i`, or `None` if out of range.
    pub fn segment_length_km(&self, i: usize) -> Option<f64> {
        if i >= self.segment_count() {
            return None;
        }
        Some(self.cumulative_km[i + 1] - self.cumulative_km[i])
    }

    /// Distance from the first point to `points[i]` along the polyline.
    pub fn cumulative_km(&self, i: usize) -> Option<f64> {
        self.cumulative_km.get(i).copied()
    }

    /// Position reached after travelling `traveled_km` from the first point.
    ///
    /// `traveled_km` is clamped to `[0, length_km]`; NaN is treated as 0.
    /// Returns `None` only for an empty polyline.  A single-point polyline
    /// always yields that point on segment 0.
    pub fn interpolate(&self, traveled_km: f64) -> Option<Interpolated> {
        let first = *self.points.first()?;
        let last = *self.points.last()?;
        let total = self.length_km();

        let d = if traveled_km.is_nan() { 0.0 } else { traveled_km.clamp(0.0, total) };

        for i in 0..self.segment_count() {
            let start = self.cumulative_km[i];
            let end = self.cumulative_km[i + 1];
            if d < end {
                let seg_len = end - start;
                let t = if seg_len > 0.0 { (d - start) / seg_len } else { 0.0 };
                return Some(Interpolated {
                    point:         self.points[i].lerp(self.points[i + 1], t),
                    segment_index: i,
                });
            }
        }

        // d == total (or a single point): closed upper boundary.
        if self.segment_count() == 0 {
            return Some(Interpolated { point: first, segment_index: 0 });
        }
        Some(Interpolated {
            point:         last,
            segment_index: self.segment_count() - 1,
        })
    }
}

/// Sum of great-circle distances over consecutive pairs.
///
/// Returns `0.0` for fewer than two points.
pub fn route_length_km(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| w[0].distance_km(w[1])).sum()
}

/// Convenience form of [`Polyline::interpolate`] for a borrowed point slice.
pub fn interpolate(points: &[GeoPoint], traveled_km: f64) -> Option<Interpolated> {
    Polyline::new(points.to_vec()).interpolate(traveled_km)
}
