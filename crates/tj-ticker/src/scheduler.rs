//! `Scheduler` — single-threaded queue of repeating tasks.
//!
//! # Model
//!
//! Each task has a payload, a fixed interval, and the wall-clock instant
//! (Unix milliseconds) it is next due.  Due instants live in a `BTreeMap`, so
//! the earliest pending work is always the first key:
//!
//! ```text
//! queue: BTreeMap<due_ms, Vec<TaskId>>
//! ```
//!
//! [`Scheduler::run_due`] is the only way tasks fire.  The caller's event
//! loop decides when to call it (typically after sleeping until
//! [`Scheduler::next_due`]).  A task fires at most once per call, then is
//! re-queued one interval after its previous due time; if the loop fell so
//! far behind that this is already in the past, the task is re-queued one
//! interval after `now` instead.  Missed periods are skipped, never replayed
//! as a burst, and a task can never overlap with itself.
//!
//! # Cancellation
//!
//! `schedule_every` returns a [`TaskHandle`].  Cancelling the handle flags
//! the task; the scheduler drops flagged tasks the next time it sees them.
//! [`Scheduler::cancel_all`] flags and drops everything at once.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Identifies one scheduled task.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TaskId(pub u32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

/// Cancellation handle for a scheduled task.
///
/// Clones share the same flag.  Cancelling is idempotent.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    id:        TaskId,
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct TaskEntry<T> {
    payload:     T,
    interval_ms: i64,
    cancelled:   Rc<Cell<bool>>,
}

/// A queue of repeating tasks keyed by their next due instant.
pub struct Scheduler<T> {
    queue:   BTreeMap<i64, Vec<TaskId>>,
    tasks:   HashMap<TaskId, TaskEntry<T>>,
    next_id: u32,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            queue:   BTreeMap::new(),
            tasks:   HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `payload` every `interval`, first at `first_due_ms`.
    ///
    /// Intervals shorter than one millisecond are rounded up to one.
    pub fn schedule_every(&mut self, interval: Duration, first_due_ms: i64, payload: T) -> TaskHandle {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let interval_ms = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX).max(1);
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.insert(id, TaskEntry {
            payload,
            interval_ms,
            cancelled: Rc::clone(&cancelled),
        });
        self.queue.entry(first_due_ms).or_default().push(id);

        TaskHandle { id, cancelled }
    }

    /// Fire every live task due at or before `now_ms`.
    ///
    /// Returns the fired payloads ordered by due instant, then by scheduling
    /// order.  Cancelled tasks encountered along the way are dropped.
    pub fn run_due(&mut self, now_ms: i64) -> Vec<(TaskId, T)> {
        let mut fired = Vec::new();
        let mut requeue: Vec<(i64, TaskId)> = Vec::new();

        while let Some(entry) = self.queue.first_entry() {
            if *entry.key() > now_ms {
                break;
            }
            let (due, ids) = entry.remove_entry();
            for id in ids {
                let Some(task) = self.tasks.get(&id) else { continue };
                if task.cancelled.get() {
                    self.tasks.remove(&id);
                    continue;
                }
                fired.push((id, task.payload.clone()));

                let mut next = due.saturating_add(task.interval_ms);
                if next <= now_ms {
                    next = now_ms.saturating_add(task.interval_ms);
                }
                requeue.push((next, id));
            }
        }

        for (due, id) in requeue {
            self.queue.entry(due).or_default().push(id);
        }
        fired
    }

    /// The earliest instant at which a live task is due, or `None` when no
    /// live tasks remain.
    pub fn next_due(&self) -> Option<i64> {
        self.queue
            .iter()
            .find(|(_, ids)| ids.iter().any(|id| self.is_live(*id)))
            .map(|(due, _)| *due)
    }

    /// Cancel one task by id.  Returns `false` if it was unknown.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.tasks.remove(&id) {
            Some(task) => {
                task.cancelled.set(true);
                true
            }
            None => false,
        }
    }

    /// Cancel every task and empty the queue.
    pub fn cancel_all(&mut self) {
        for task in self.tasks.values() {
            task.cancelled.set(true);
        }
        self.tasks.clear();
        self.queue.clear();
    }

    /// Number of live (not cancelled) tasks.
    pub fn len(&self) -> usize {
        self.tasks.values().filter(|t| !t.cancelled.get()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_live(&self, id: TaskId) -> bool {
        self.tasks.get(&id).is_some_and(|t| !t.cancelled.get())
    }
}
