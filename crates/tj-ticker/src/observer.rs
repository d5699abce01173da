//! Collaborator seams: the map's position sink and the display observer.

use tj_core::{GeoPoint, SpeedChange};
use tj_journey::JourneyState;

/// Receives the train's latest position.
///
/// Handed to the tracker at construction; the tracker calls it after every
/// recompute.  Implementors own any throttling of their own visual updates.
///
/// Closures taking a [`GeoPoint`] implement this trait directly.
pub trait PositionSink {
    fn set_position(&mut self, point: GeoPoint);
}

impl<F: FnMut(GeoPoint)> PositionSink for F {
    fn set_position(&mut self, point: GeoPoint) {
        self(point)
    }
}

/// A [`PositionSink`] that discards every update.
pub struct NoopSink;

impl PositionSink for NoopSink {
    fn set_position(&mut self, _point: GeoPoint) {}
}

/// Callbacks invoked by [`JourneyTracker`][crate::JourneyTracker] as its
/// tasks fire.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl JourneyObserver for ProgressPrinter {
///     fn on_state(&mut self, state: &JourneyState) {
///         println!("{}% complete", state.progress_pct);
///     }
/// }
/// ```
pub trait JourneyObserver {
    /// Called after every recompute (clock tick or accepted speed change).
    fn on_state(&mut self, _state: &JourneyState) {}

    /// Called when the fact rotation advances.
    fn on_fact(&mut self, _fact: &str) {}

    /// Called for every speed-change request, accepted or not.
    fn on_speed_change(&mut self, _change: &SpeedChange) {}

    /// Called once when the tracker's tasks are cancelled.
    fn on_shutdown(&mut self) {}
}

/// A [`JourneyObserver`] that does nothing.
pub struct NoopObserver;

impl JourneyObserver for NoopObserver {}
