//! `tj-ticker` — periodic driver for the train journey simulation.
//!
//! # Two periodic tasks
//!
//! ```text
//! every tick_interval_secs:
//!   ① Read the clock.
//!   ② JourneyModel::state_at(now) — full recompute from departure.
//!   ③ PositionSink::set_position(state.current_point).
//!   ④ JourneyObserver::on_state(&state).
//!
//! every fact_interval_secs:
//!   ① FactRotator::advance().
//!   ② JourneyObserver::on_fact(fact).
//! ```
//!
//! Both tasks live in one [`Scheduler`] and are cancelled together by
//! [`JourneyTracker::shutdown`] (or when the tracker is dropped).  Speed
//! changes are applied immediately through [`JourneyTracker::adjust_speed`]
//! and trigger an out-of-schedule recompute.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tj_core::{Clock, SystemTimeSource};
//! use tj_route::delhi_patna;
//! use tj_ticker::{NoopObserver, NoopSink, TrackerBuilder};
//!
//! let clock = Clock::from_offset_minutes(330, SystemTimeSource)?;
//! let mut tracker = TrackerBuilder::new(Arc::new(delhi_patna()?), clock, NoopSink).build()?;
//! loop {
//!     if let Some(wait) = tracker.until_next_due() {
//!         std::thread::sleep(wait);
//!     }
//!     tracker.pump(&mut NoopObserver);
//! }
//! ```

pub mod error;
pub mod observer;
pub mod scheduler;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use error::{TrackerError, TrackerResult};
pub use observer::{JourneyObserver, NoopObserver, NoopSink, PositionSink};
pub use scheduler::{Scheduler, TaskHandle, TaskId};
pub use tracker::{JourneyTracker, TrackerBuilder, TrackerTask};
