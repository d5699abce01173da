//! `TerminalMap` — a text stand-in for an interactive map widget.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use tj_core::{BoundingBox, GeoPoint, TimeSource};
use tj_ticker::PositionSink;

/// Shrink applied to the viewport before the keep-in-view check.
const KEEP_IN_VIEW_PAD: f64 = -0.3;

/// Margin added around the route when fitting the view.
pub const FIT_PAD: f64 = 0.2;

/// Tracks the train marker and a viewport that follows it.
///
/// The viewport recentres ("pans") on the marker only when the marker has
/// left the inner 40 % of the view, and never more than once per
/// `throttle` as read from the journey's own time source, so a replayed
/// journey pans as often as a live one.  Marker moves in between are
/// always recorded.
pub struct TerminalMap<S: TimeSource> {
    source:    S,
    viewport:  Option<BoundingBox>,
    marker:    Option<GeoPoint>,
    throttle:  TimeDelta,
    last_pan:  Option<DateTime<Utc>>,
    pans:      usize,
}

impl<S: TimeSource> TerminalMap<S> {
    /// An empty map; call [`fit`][Self::fit] to give it a view.
    pub fn new(source: S, throttle: Duration) -> Self {
        Self {
            source,
            viewport: None,
            marker:   None,
            throttle: TimeDelta::from_std(throttle).unwrap_or(TimeDelta::MAX),
            last_pan: None,
            pans:     0,
        }
    }

    /// Frame `bounds` (typically route plus marker) with a [`FIT_PAD`]
    /// margin.  Fitting is not a pan and does not reset the throttle.
    pub fn fit(&mut self, bounds: Option<BoundingBox>) {
        if let Some(bounds) = bounds {
            self.viewport = Some(bounds.pad(FIT_PAD));
        }
    }

    pub fn viewport(&self) -> Option<BoundingBox> {
        self.viewport
    }

    pub fn marker(&self) -> Option<GeoPoint> {
        self.marker
    }

    pub fn pans(&self) -> usize {
        self.pans
    }

    /// One-line summary for the dashboard.
    pub fn describe(&self) -> String {
        let marker = self.marker().map_or_else(|| "-".to_string(), |m| m.to_string());
        match self.viewport() {
            Some(view) => {
                let c = view.center();
                format!("marker {marker}  view centre ({:.2}, {:.2})  pans {}", c.lat, c.lon, self.pans())
            }
            None => format!("marker {marker}  no view"),
        }
    }

    fn pan_allowed(&self, now: DateTime<Utc>) -> bool {
        self.last_pan.is_none_or(|last| now - last >= self.throttle)
    }
}

impl<S: TimeSource> PositionSink for TerminalMap<S> {
    fn set_position(&mut self, point: GeoPoint) {
        self.marker = Some(point);
        let Some(view) = self.viewport else { return };
        if view.pad(KEEP_IN_VIEW_PAD).contains(point) {
            return;
        }
        let now = self.source.now_utc();
        if !self.pan_allowed(now) {
            return;
        }
        let (half_lat, half_lon) = view.half_extent();
        self.viewport = Some(BoundingBox::around(point, half_lat, half_lon));
        self.last_pan = Some(now);
        self.pans += 1;
        log::debug!("map panned to {point}");
    }
}
