//! Unit tests for the terminal map.

use std::time::Duration;

use chrono::{TimeZone, Utc};

use tj_core::{BoundingBox, GeoPoint, ManualTimeSource};
use tj_ticker::PositionSink;

use crate::map::{FIT_PAD, TerminalMap};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn source() -> ManualTimeSource {
    ManualTimeSource::new(Utc.with_ymd_and_hms(2024, 3, 1, 0, 30, 0).unwrap())
}

/// A map over a 10° × 10° box centred on (25, 80), throttled to 5 s.
fn fitted_map(source: &ManualTimeSource) -> TerminalMap<ManualTimeSource> {
    let mut map = TerminalMap::new(source.clone(), Duration::from_secs(5));
    let raw = BoundingBox::around(GeoPoint::new(25.0, 80.0), 5.0 / 1.4, 5.0 / 1.4);
    map.fit(Some(raw));
    map
}

// ── TerminalMap ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod terminal_map {
    use super::*;

    #[test]
    fn fit_pads_the_bounds() {
        let mut map = TerminalMap::new(source(), Duration::from_secs(5));
        assert_eq!(map.viewport(), None);
        let raw = BoundingBox::around(GeoPoint::new(25.0, 80.0), 1.0, 2.0);
        map.fit(Some(raw));
        assert_eq!(map.viewport(), Some(raw.pad(FIT_PAD)));
        map.fit(None);
        assert_eq!(map.viewport(), Some(raw.pad(FIT_PAD)));
    }

    #[test]
    fn no_view_records_marker_only() {
        let mut map = TerminalMap::new(source(), Duration::from_secs(5));
        map.set_position(GeoPoint::new(28.6, 77.2));
        assert_eq!(map.marker(), Some(GeoPoint::new(28.6, 77.2)));
        assert_eq!(map.pans(), 0);
    }

    #[test]
    fn marker_inside_inner_view_does_not_pan() {
        let src = source();
        let mut map = fitted_map(&src);
        let view = map.viewport().unwrap();
        // Inner 40 % of a 10° box is ±2° around the centre.
        map.set_position(GeoPoint::new(26.5, 81.5));
        assert_eq!(map.pans(), 0);
        assert_eq!(map.viewport(), Some(view));
    }

    #[test]
    fn marker_leaving_inner_view_pans_onto_it() {
        let src = source();
        let mut map = fitted_map(&src);
        let (half_lat, half_lon) = map.viewport().unwrap().half_extent();
        let p = GeoPoint::new(27.5, 80.0);
        map.set_position(p);
        assert_eq!(map.pans(), 1);
        let view = map.viewport().unwrap();
        assert!((view.center().lat - p.lat).abs() < 1e-9);
        let (new_lat, new_lon) = view.half_extent();
        assert!((new_lat - half_lat).abs() < 1e-9 && (new_lon - half_lon).abs() < 1e-9);
    }

    #[test]
    fn pans_at_most_once_per_throttle_on_journey_time() {
        let src = source();
        let mut map = fitted_map(&src);

        // Rapid updates at one instant: only the first pan goes through.
        let mut lon = 80.0;
        for _ in 0..20 {
            lon += 3.0;
            map.set_position(GeoPoint::new(25.0, lon));
        }
        assert_eq!(map.pans(), 1);

        src.advance_secs(4);
        map.set_position(GeoPoint::new(25.0, lon + 3.0));
        assert_eq!(map.pans(), 1);

        src.advance_secs(1);
        let p = GeoPoint::new(25.0, lon + 6.0);
        map.set_position(p);
        assert_eq!(map.pans(), 2);
        assert!(map.viewport().unwrap().contains(p));
    }

    #[test]
    fn replay_speed_updates_keep_marker_in_view() {
        let src = source();
        let mut map = fitted_map(&src);
        // One update per 15 s of journey time, however fast they arrive.
        for step in 0..20 {
            src.advance_secs(15);
            let p = GeoPoint::new(25.0 - 0.3 * step as f64, 80.0 + 0.6 * step as f64);
            map.set_position(p);
            assert!(map.viewport().unwrap().contains(p), "step {step}");
        }
        assert!(map.pans() >= 1);
    }
}
