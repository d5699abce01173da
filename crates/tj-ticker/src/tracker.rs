//! The `JourneyTracker` and its builder.

use std::sync::Arc;
use std::time::Duration;

use tj_core::{Clock, SpeedChange, TimeSource, Timestamp};
use tj_journey::{FactRotator, JourneyConfig, JourneyModel, JourneyState, MapSnapshot, resolve_initial_speed};
use tj_route::Route;

use crate::{JourneyObserver, PositionSink, Scheduler, TaskHandle, TrackerError, TrackerResult};

/// Payloads of the tracker's two periodic tasks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackerTask {
    /// Refresh `now` and recompute the journey.
    Tick,
    /// Advance the display-only fact index.
    RotateFact,
}

// ── JourneyTracker ────────────────────────────────────────────────────────────

/// Drives a [`JourneyModel`] from a clock.
///
/// The tracker owns two independent repeating tasks:
///
/// 1. **Tick** (every `tick_interval_secs`): read the clock, recompute the
///    full [`JourneyState`], push the new position into the
///    [`PositionSink`], and report it via [`JourneyObserver::on_state`].
/// 2. **RotateFact** (every `fact_interval_secs`): advance the
///    [`FactRotator`] and report it via [`JourneyObserver::on_fact`].
///
/// Nothing runs by itself.  The caller's loop calls [`pump`][Self::pump],
/// which fires whatever is due and returns.  Every call is synchronous and
/// bounded; there is no threading and no shared mutable state.
///
/// Create via [`TrackerBuilder`].
pub struct JourneyTracker<S: TimeSource, P: PositionSink> {
    model:     JourneyModel,
    clock:     Clock<S>,
    sink:      P,
    facts:     FactRotator,
    scheduler: Scheduler<TrackerTask>,
    tick_task: TaskHandle,
    fact_task: TaskHandle,
    state:     JourneyState,
    ticks:     u64,
    stopped:   bool,
}

impl<S: TimeSource, P: PositionSink> JourneyTracker<S, P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Fire every task that is due at the clock's current reading.
    ///
    /// Returns the number of tasks fired.  Does nothing after
    /// [`shutdown`][Self::shutdown].
    pub fn pump<O: JourneyObserver>(&mut self, observer: &mut O) -> usize {
        let now = self.clock.now();
        let fired = self.scheduler.run_due(now.timestamp_millis());
        let count = fired.len();

        for (_, task) in fired {
            match task {
                TrackerTask::Tick => {
                    self.recompute(now);
                    self.ticks += 1;
                    observer.on_state(&self.state);
                }
                TrackerTask::RotateFact => {
                    if let Some(fact) = self.facts.advance() {
                        observer.on_fact(fact);
                    }
                }
            }
        }
        count
    }

    /// Apply a free-form speed request and, if accepted, recompute at once.
    ///
    /// Rejected input leaves the speed and the state untouched.  Returns
    /// `None` without touching anything once the tracker has stopped.
    pub fn adjust_speed<O: JourneyObserver>(
        &mut self,
        input: &str,
        observer: &mut O,
    ) -> Option<SpeedChange> {
        if self.stopped {
            log::debug!("speed input {input:?} ignored: tracker stopped");
            return None;
        }
        let change = self.model.apply_speed_input(input);
        observer.on_speed_change(&change);
        if !change.is_rejected() {
            let now = self.clock.now();
            self.recompute(now);
            observer.on_state(&self.state);
        }
        Some(change)
    }

    /// Recompute immediately, outside the tick schedule.
    pub fn refresh(&mut self) -> &JourneyState {
        let now = self.clock.now();
        self.recompute(now);
        &self.state
    }

    /// Cancel both periodic tasks together and empty the queue.
    ///
    /// Safe to call repeatedly, and after either task handle was cancelled
    /// on its own; `on_shutdown` is reported exactly once.
    pub fn shutdown<O: JourneyObserver>(&mut self, observer: &mut O) {
        self.tick_task.cancel();
        self.fact_task.cancel();
        self.scheduler.cancel_all();
        if self.stopped {
            return;
        }
        self.stopped = true;
        log::info!("journey tracker stopped after {} ticks", self.ticks);
        observer.on_shutdown();
    }

    /// `false` after [`shutdown`][Self::shutdown], or once every task has
    /// been cancelled through its handle.
    pub fn is_running(&self) -> bool {
        !self.stopped && !self.scheduler.is_empty()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The most recently computed state.
    pub fn state(&self) -> &JourneyState {
        &self.state
    }

    pub fn model(&self) -> &JourneyModel {
        &self.model
    }

    pub fn clock(&self) -> &Clock<S> {
        &self.clock
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Mutable access to the sink, e.g. to refit a map view.  The tracker
    /// keeps pushing positions into it.
    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    pub fn current_fact(&self) -> Option<&str> {
        self.facts.current()
    }

    /// Number of clock-tick recomputes so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Handle for the clock-tick task.
    pub fn tick_handle(&self) -> &TaskHandle {
        &self.tick_task
    }

    /// Handle for the fact-rotation task.
    pub fn fact_handle(&self) -> &TaskHandle {
        &self.fact_task
    }

    /// Map view of the latest state.
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot::new(self.model.route(), &self.state)
    }

    /// Unix milliseconds at which the next task is due, or `None` once
    /// stopped.
    pub fn next_due(&self) -> Option<i64> {
        self.scheduler.next_due()
    }

    /// How long until the next task is due, measured on the tracker's
    /// clock.  `Some(Duration::ZERO)` if something is already due; `None`
    /// once stopped.
    pub fn until_next_due(&self) -> Option<Duration> {
        let due = self.next_due()?;
        let now = self.clock.now().timestamp_millis();
        Some(Duration::from_millis(u64::try_from(due - now).unwrap_or(0)))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn recompute(&mut self, now: Timestamp) {
        self.state = self.model.state_at(now);
        self.sink.set_position(self.state.current_point);
    }
}

impl<S: TimeSource, P: PositionSink> Drop for JourneyTracker<S, P> {
    fn drop(&mut self) {
        self.tick_task.cancel();
        self.fact_task.cancel();
        self.scheduler.cancel_all();
    }
}

// ── TrackerBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`JourneyTracker<S, P>`].
///
/// # Required inputs
///
/// - `Arc<Route>` — the validated route
/// - [`Clock<S>`] — fixed-offset clock over any [`TimeSource`]
/// - `P: PositionSink` — the map collaborator
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                        |
/// |-------------------------|--------------------------------|
/// | `.config(c)`            | `JourneyConfig::default()`     |
/// | `.speed_override(s)`    | none (configured default speed)|
/// | `.facts(f)`             | empty `FactRotator`            |
///
/// # Example
///
/// ```rust,ignore
/// let clock = Clock::from_offset_minutes(330, SystemTimeSource)?;
/// let mut tracker = TrackerBuilder::new(Arc::new(delhi_patna()?), clock, NoopSink)
///     .speed_override(Some("80"))
///     .facts(FactRotator::new(ROUTE_FACTS.iter().copied()))
///     .build()?;
/// tracker.pump(&mut NoopObserver);
/// ```
pub struct TrackerBuilder<S: TimeSource, P: PositionSink> {
    route:          Arc<Route>,
    clock:          Clock<S>,
    sink:           P,
    config:         JourneyConfig,
    speed_override: Option<String>,
    facts:          FactRotator,
}

impl<S: TimeSource, P: PositionSink> TrackerBuilder<S, P> {
    pub fn new(route: Arc<Route>, clock: Clock<S>, sink: P) -> Self {
        Self {
            route,
            clock,
            sink,
            config:         JourneyConfig::default(),
            speed_override: None,
            facts:          FactRotator::default(),
        }
    }

    pub fn config(mut self, config: JourneyConfig) -> Self {
        self.config = config;
        self
    }

    /// External initial speed, e.g. a query value.  Unparseable input is
    /// ignored in favour of the configured default.
    pub fn speed_override(mut self, input: Option<&str>) -> Self {
        self.speed_override = input.map(str::to_string);
        self
    }

    pub fn facts(mut self, facts: FactRotator) -> Self {
        self.facts = facts;
        self
    }

    /// Validate the config, fix the departure time, compute the initial
    /// state, push the initial position, and schedule both tasks.
    ///
    /// Fails if the clock's offset differs from `config.tz_offset_minutes`.
    pub fn build(self) -> TrackerResult<JourneyTracker<S, P>> {
        self.config.validate()?;

        let clock_minutes = self.clock.offset().local_minus_utc() / 60;
        if clock_minutes != self.config.tz_offset_minutes {
            return Err(TrackerError::OffsetMismatch {
                clock_minutes,
                config_minutes: self.config.tz_offset_minutes,
            });
        }

        let now = self.clock.now();
        let departure =
            self.clock
                .at_time_of_day(now, self.config.departure_hour, self.config.departure_minute)?;
        let speed = resolve_initial_speed(self.speed_override.as_deref(), self.config.default_speed());

        let model = JourneyModel::new(self.route, departure, speed)
            .with_window(self.config.upcoming_window);
        let state = model.state_at(now);

        let mut sink = self.sink;
        sink.set_position(state.current_point);

        let now_ms = now.timestamp_millis();
        let tick_every = Duration::from_secs(self.config.tick_interval_secs);
        let fact_every = Duration::from_secs(self.config.fact_interval_secs);

        let mut scheduler = Scheduler::new();
        let tick_task = scheduler.schedule_every(
            tick_every,
            now_ms.saturating_add(duration_ms(tick_every)),
            TrackerTask::Tick,
        );
        let fact_task = scheduler.schedule_every(
            fact_every,
            now_ms.saturating_add(duration_ms(fact_every)),
            TrackerTask::RotateFact,
        );

        log::info!(
            "tracking {:?} ({:.1} km, {} stops): departure {}, speed {}, tick every {:?}",
            model.route().name(),
            model.route().total_km(),
            model.route().len(),
            departure.format("%Y-%m-%d %H:%M %:z"),
            speed,
            tick_every
        );

        Ok(JourneyTracker {
            model,
            clock: self.clock,
            sink,
            facts: self.facts,
            scheduler,
            tick_task,
            fact_task,
            state,
            ticks: 0,
            stopped: false,
        })
    }
}

fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
