//! Read-only view handed to map collaborators.

use tj_core::{BoundingBox, GeoPoint};
use tj_route::Route;

use crate::JourneyState;

/// Everything a map needs to draw the route and the train marker.
///
/// The journey core never receives anything back from the map.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MapSnapshot {
    pub points:  Vec<GeoPoint>,
    pub current: GeoPoint,
    pub start:   GeoPoint,
    pub end:     GeoPoint,
}

impl MapSnapshot {
    pub fn new(route: &Route, state: &JourneyState) -> Self {
        Self {
            points:  route.points().to_vec(),
            current: state.current_point,
            start:   route.start(),
            end:     route.end(),
        }
    }

    /// Box around the route polyline and the marker.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points.iter().chain(std::iter::once(&self.current)))
    }
}
