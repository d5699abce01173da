//! Unit tests for tj-ticker.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use tj_core::{Clock, GeoPoint, ManualTimeSource, SpeedChange};
use tj_journey::{FactRotator, JourneyConfig, JourneyState};
use tj_route::{Route, RouteBuilder};

use crate::{
    JourneyObserver, JourneyTracker, NoopObserver, NoopSink, Scheduler, TrackerBuilder, TrackerError,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 2024-03-01 06:00 IST, i.e. exactly the default departure.
fn departure_source() -> ManualTimeSource {
    ManualTimeSource::new(Utc.with_ymd_and_hms(2024, 3, 1, 0, 30, 0).unwrap())
}

fn route() -> Arc<Route> {
    Arc::new(
        RouteBuilder::new("Delhi → Patna")
            .stop("Delhi", 28.61, 77.23)
            .stop("Kanpur", 26.45, 80.35)
            .stop("Patna", 25.59, 85.14)
            .build()
            .unwrap(),
    )
}

/// Records every callback in order.
#[derive(Default)]
struct Recorder {
    states:   Vec<JourneyState>,
    facts:    Vec<String>,
    changes:  Vec<SpeedChange>,
    shutdown: usize,
}

impl JourneyObserver for Recorder {
    fn on_state(&mut self, state: &JourneyState) {
        self.states.push(state.clone());
    }
    fn on_fact(&mut self, fact: &str) {
        self.facts.push(fact.to_string());
    }
    fn on_speed_change(&mut self, change: &SpeedChange) {
        self.changes.push(change.clone());
    }
    fn on_shutdown(&mut self) {
        self.shutdown += 1;
    }
}

type Positions = Rc<RefCell<Vec<GeoPoint>>>;

/// Builds a tracker whose sink appends to the returned vector.
fn tracker_with(
    source: &ManualTimeSource,
    config: JourneyConfig,
    speed: Option<&str>,
) -> (JourneyTracker<ManualTimeSource, impl FnMut(GeoPoint)>, Positions) {
    let positions: Positions = Rc::default();
    let sink = {
        let positions = Rc::clone(&positions);
        move |p: GeoPoint| positions.borrow_mut().push(p)
    };
    let clock = Clock::from_offset_minutes(330, source.clone()).unwrap();
    let tracker = TrackerBuilder::new(route(), clock, sink)
        .config(config)
        .speed_override(speed)
        .facts(FactRotator::new(["one", "two", "three"]))
        .build()
        .unwrap();
    (tracker, positions)
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn nothing_fires_before_due() {
        let mut s = Scheduler::new();
        s.schedule_every(Duration::from_secs(10), 1_000, 'a');
        assert!(s.run_due(999).is_empty());
        assert_eq!(s.next_due(), Some(1_000));
    }

    #[test]
    fn fires_and_requeues_one_interval_later() {
        let mut s = Scheduler::new();
        let h = s.schedule_every(Duration::from_secs(10), 1_000, 'a');
        let fired = s.run_due(1_000);
        assert_eq!(fired, vec![(h.id(), 'a')]);
        assert_eq!(s.next_due(), Some(11_000));
    }

    #[test]
    fn late_loop_skips_missed_periods() {
        let mut s = Scheduler::new();
        s.schedule_every(Duration::from_secs(10), 1_000, 'a');
        // 35 s late: fires once, then resumes one interval after now.
        assert_eq!(s.run_due(36_000).len(), 1);
        assert_eq!(s.next_due(), Some(46_000));
        assert!(s.run_due(45_999).is_empty());
    }

    #[test]
    fn orders_by_due_then_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_every(Duration::from_secs(5), 2_000, 'b');
        s.schedule_every(Duration::from_secs(5), 1_000, 'a');
        s.schedule_every(Duration::from_secs(5), 2_000, 'c');
        let payloads: Vec<char> = s.run_due(2_000).into_iter().map(|(_, p)| p).collect();
        assert_eq!(payloads, vec!['a', 'b', 'c']);
    }

    #[test]
    fn cancelled_handle_stops_firing() {
        let mut s = Scheduler::new();
        let a = s.schedule_every(Duration::from_secs(1), 0, 'a');
        let b = s.schedule_every(Duration::from_secs(1), 0, 'b');
        a.cancel();
        assert!(a.is_cancelled());
        assert_eq!(s.len(), 1);
        let fired = s.run_due(0);
        assert_eq!(fired, vec![(b.id(), 'b')]);
    }

    #[test]
    fn cancel_by_id_and_cancel_all() {
        let mut s = Scheduler::new();
        let a = s.schedule_every(Duration::from_secs(1), 0, 'a');
        let b = s.schedule_every(Duration::from_secs(1), 0, 'b');
        assert!(s.cancel(a.id()));
        assert!(!s.cancel(a.id()));
        assert!(a.is_cancelled());

        s.cancel_all();
        assert!(b.is_cancelled());
        assert!(s.is_empty());
        assert_eq!(s.next_due(), None);
        assert!(s.run_due(i64::MAX).is_empty());
    }

    #[test]
    fn sub_millisecond_interval_rounds_up() {
        let mut s = Scheduler::new();
        s.schedule_every(Duration::ZERO, 0, 'a');
        assert_eq!(s.run_due(0).len(), 1);
        assert_eq!(s.next_due(), Some(1));
    }
}

// ── JourneyTracker ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tracker {
    use super::*;

    #[test]
    fn build_pushes_initial_position() {
        let source = departure_source();
        let (tracker, positions) = tracker_with(&source, JourneyConfig::default(), None);
        let start = tracker.model().route().start();
        assert_eq!(positions.borrow().as_slice(), &[start]);
        assert_eq!(tracker.state().traveled_km, 0.0);
        assert_eq!(tracker.state().speed.kmph(), 65.0);
        assert_eq!(tracker.model().departure(), tracker.clock().now());
        assert!(tracker.is_running());
        assert_eq!(tracker.current_fact(), Some("one"));
    }

    #[test]
    fn pump_before_first_tick_does_nothing() {
        let source = departure_source();
        let (mut tracker, positions) = tracker_with(&source, JourneyConfig::default(), None);
        let mut rec = Recorder::default();
        source.advance_secs(14);
        assert_eq!(tracker.pump(&mut rec), 0);
        assert!(rec.states.is_empty());
        assert_eq!(positions.borrow().len(), 1);
        assert_eq!(tracker.until_next_due(), Some(Duration::from_secs(1)));
        let now_ms = tracker.clock().now().timestamp_millis();
        assert_eq!(tracker.next_due(), Some(now_ms + 1_000));
    }

    #[test]
    fn tick_recomputes_from_clock() {
        let source = departure_source();
        let (mut tracker, positions) = tracker_with(&source, JourneyConfig::default(), Some("60"));
        let mut rec = Recorder::default();

        // One hour later the loop wakes once; the late tick fires a single time.
        source.advance_secs(3600);
        let fired = tracker.pump(&mut rec);
        assert_eq!(fired, 2);
        assert_eq!(tracker.ticks(), 1);
        assert_eq!(rec.states.len(), 1);
        assert!((rec.states[0].traveled_km - 60.0).abs() < 1e-6);
        assert_eq!(positions.borrow().len(), 2);
        assert_eq!(positions.borrow()[1], tracker.state().current_point);
        assert_eq!(rec.facts, vec!["two".to_string()]);
    }

    #[test]
    fn facts_rotate_on_their_own_interval() {
        let source = departure_source();
        let config = JourneyConfig { tick_interval_secs: 60, fact_interval_secs: 15, ..Default::default() };
        let (mut tracker, _) = tracker_with(&source, config, None);
        let mut rec = Recorder::default();
        for _ in 0..4 {
            source.advance_secs(15);
            tracker.pump(&mut rec);
        }
        assert_eq!(rec.facts, vec!["two", "three", "one", "two"]);
        assert_eq!(rec.states.len(), 1);
        assert_eq!(tracker.current_fact(), Some("two"));
    }

    #[test]
    fn adjust_speed_recomputes_immediately() {
        let source = departure_source();
        let (mut tracker, positions) = tracker_with(&source, JourneyConfig::default(), None);
        let mut rec = Recorder::default();
        source.advance_secs(7200);

        let change = tracker.adjust_speed("100", &mut rec).unwrap();
        assert!(!change.is_rejected());
        assert_eq!(rec.changes.len(), 1);
        assert_eq!(rec.states.len(), 1);
        assert!((tracker.state().traveled_km - 200.0).abs() < 1e-6);
        assert_eq!(positions.borrow().len(), 2);
        // Out-of-schedule recompute does not count as a tick.
        assert_eq!(tracker.ticks(), 0);
    }

    #[test]
    fn rejected_speed_leaves_state_alone() {
        let source = departure_source();
        let (mut tracker, positions) = tracker_with(&source, JourneyConfig::default(), None);
        let mut rec = Recorder::default();
        source.advance_secs(600);
        let before = tracker.state().clone();

        let change = tracker.adjust_speed("abc", &mut rec).unwrap();
        assert!(change.is_rejected());
        assert_eq!(rec.changes, vec![change]);
        assert!(rec.states.is_empty());
        assert_eq!(tracker.state(), &before);
        assert_eq!(tracker.model().speed().kmph(), 65.0);
        assert_eq!(positions.borrow().len(), 1);
    }

    #[test]
    fn invalid_override_uses_configured_default() {
        let source = departure_source();
        let config = JourneyConfig { default_speed_kmph: 90.0, ..Default::default() };
        let (tracker, _) = tracker_with(&source, config, Some("fast"));
        assert_eq!(tracker.model().speed().kmph(), 90.0);
    }

    #[test]
    fn shutdown_cancels_both_tasks_once() {
        let source = departure_source();
        let (mut tracker, _) = tracker_with(&source, JourneyConfig::default(), None);
        let mut rec = Recorder::default();
        let tick = tracker.tick_handle().clone();
        let fact = tracker.fact_handle().clone();

        tracker.shutdown(&mut rec);
        tracker.shutdown(&mut rec);
        assert_eq!(rec.shutdown, 1);
        assert!(tick.is_cancelled() && fact.is_cancelled());
        assert!(!tracker.is_running());
        assert_eq!(tracker.until_next_due(), None);

        source.advance_secs(3600);
        assert_eq!(tracker.pump(&mut rec), 0);
        assert!(rec.states.is_empty());
    }

    #[test]
    fn shutdown_after_handles_cancelled_still_reports() {
        let source = departure_source();
        let (mut tracker, _) = tracker_with(&source, JourneyConfig::default(), None);
        let mut rec = Recorder::default();
        tracker.tick_handle().cancel();
        tracker.fact_handle().cancel();
        assert!(!tracker.is_running());

        tracker.shutdown(&mut rec);
        assert_eq!(rec.shutdown, 1);
        assert_eq!(tracker.next_due(), None);
        tracker.shutdown(&mut rec);
        assert_eq!(rec.shutdown, 1);
    }

    #[test]
    fn speed_input_ignored_after_shutdown() {
        let source = departure_source();
        let (mut tracker, positions) = tracker_with(&source, JourneyConfig::default(), None);
        let mut rec = Recorder::default();
        tracker.shutdown(&mut rec);
        source.advance_secs(3600);

        assert_eq!(tracker.adjust_speed("100", &mut rec), None);
        assert!(rec.changes.is_empty());
        assert!(rec.states.is_empty());
        assert_eq!(tracker.model().speed().kmph(), 65.0);
        assert_eq!(positions.borrow().len(), 1);
    }

    #[test]
    fn clock_offset_must_match_config() {
        let clock = Clock::from_offset_minutes(330, departure_source()).unwrap();
        let config = JourneyConfig { tz_offset_minutes: 0, ..Default::default() };
        let result = TrackerBuilder::new(route(), clock, NoopSink).config(config).build();
        assert!(matches!(
            result,
            Err(TrackerError::OffsetMismatch { clock_minutes: 330, config_minutes: 0 })
        ));
    }

    #[test]
    fn drop_cancels_handles() {
        let source = departure_source();
        let (tracker, _) = tracker_with(&source, JourneyConfig::default(), None);
        let tick = tracker.tick_handle().clone();
        drop(tracker);
        assert!(tick.is_cancelled());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let clock = Clock::from_offset_minutes(330, departure_source()).unwrap();
        let config = JourneyConfig { tick_interval_secs: 0, ..Default::default() };
        let result = TrackerBuilder::new(route(), clock, NoopSink).config(config).build();
        assert!(result.is_err());
    }

    #[test]
    fn arrival_pins_marker_to_terminus() {
        let source = departure_source();
        let (mut tracker, _) = tracker_with(&source, JourneyConfig::default(), Some("120"));
        source.advance_secs(48 * 3600);
        tracker.pump(&mut NoopObserver);
        let end = tracker.model().route().end();
        assert!(tracker.state().is_arrived());
        assert_eq!(tracker.state().current_point, end);
        assert_eq!(tracker.snapshot().current, end);
        assert_eq!(tracker.state().progress_pct, 100);
    }
}
