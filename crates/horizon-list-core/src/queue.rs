//! Serialized step queues.
//!
//! A [`StepQueue`] runs closures strictly one after another. Each step is
//! handed a [`Done`] token and the next step only starts once that token is
//! finished, either directly inside the step or later from an asynchronous
//! completion (the end of a visual transition, for example).
//!
//! Queues are independent: two queues never wait on each other.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::logging::targets;

/// A unique identifier for a step queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueId(u64);

impl QueueId {
    /// Get the raw u64 value of this queue ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

fn next_queue_id() -> QueueId {
    QueueId(NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Completion token passed to every step.
///
/// Finishing the token lets the owning queue move on. Dropping it without
/// finishing stalls the queue; that is the caller's contract, not an error.
#[must_use = "a step that never finishes its token stalls its queue"]
pub struct Done {
    callback: Box<dyn FnOnce() + Send>,
}

impl Done {
    /// Wrap an arbitrary completion callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A token whose completion does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Run `before` when this token is finished, ahead of the original callback.
    pub fn after<F>(self, before: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::new(move || {
            before();
            self.finish();
        })
    }

    /// Signal completion.
    pub fn finish(self) {
        (self.callback)();
    }
}

impl std::fmt::Debug for Done {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Done")
    }
}

/// A boxed queue step.
pub type Step = Box<dyn FnOnce(Done) + Send + 'static>;

/// Box a closure as a [`Step`].
pub fn step<F>(f: F) -> Step
where
    F: FnOnce(Done) + Send + 'static,
{
    Box::new(f)
}

struct QueueState {
    steps: VecDeque<Step>,
    running: bool,
    started: u64,
}

/// A FIFO of steps bound to one target.
///
/// Cloning a queue yields another handle to the same FIFO.
#[derive(Clone)]
pub struct StepQueue {
    id: QueueId,
    state: Arc<Mutex<QueueState>>,
}

impl Default for StepQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl StepQueue {
    /// Create an empty, idle queue.
    pub fn new() -> Self {
        Self {
            id: next_queue_id(),
            state: Arc::new(Mutex::new(QueueState {
                steps: VecDeque::new(),
                running: false,
                started: 0,
            })),
        }
    }

    /// This queue's identifier.
    pub fn id(&self) -> QueueId {
        self.id
    }

    /// Append steps and start running them if the queue is idle.
    ///
    /// Steps that finish their token synchronously run to completion before
    /// this call returns.
    pub fn enqueue<I>(&self, steps: I)
    where
        I: IntoIterator<Item = Step>,
    {
        let start = {
            let mut state = self.state.lock();
            state.steps.extend(steps);
            if state.running || state.steps.is_empty() {
                false
            } else {
                state.running = true;
                true
            }
        };
        if start {
            self.advance();
        }
    }

    /// Whether a step is currently in flight.
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Steps waiting behind the one in flight.
    pub fn pending_count(&self) -> usize {
        self.state.lock().steps.len()
    }

    /// Total number of steps that have started since creation.
    pub fn started_count(&self) -> u64 {
        self.state.lock().started
    }

    fn advance(&self) {
        let next = {
            let mut state = self.state.lock();
            match state.steps.pop_front() {
                Some(step) => {
                    state.started += 1;
                    step
                }
                None => {
                    state.running = false;
                    tracing::trace!(target: targets::QUEUE, queue = self.id.0, "queue drained");
                    return;
                }
            }
        };
        let queue = self.clone();
        next(Done::new(move || queue.advance()));
    }
}

impl std::fmt::Debug for StepQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("StepQueue")
            .field("id", &self.id)
            .field("running", &state.running)
            .field("pending", &state.steps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Step {
        let log = log.clone();
        step(move |done| {
            log.lock().push(name);
            done.finish();
        })
    }

    #[test]
    fn test_synchronous_steps_run_in_order() {
        crate::logging::init_test_logging();
        let queue = StepQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.enqueue([record(&log, "a"), record(&log, "b"), record(&log, "c")]);

        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
        assert!(!queue.is_running());
        assert_eq!(queue.started_count(), 3);
    }

    #[test]
    fn test_next_step_waits_for_done() {
        let queue = StepQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let parked = Arc::new(Mutex::new(None::<Done>));

        let p = parked.clone();
        let l = log.clone();
        queue.enqueue([
            step(move |done| {
                l.lock().push("fade-out");
                *p.lock() = Some(done);
            }),
            record(&log, "swap"),
        ]);

        assert_eq!(*log.lock(), vec!["fade-out"]);
        assert!(queue.is_running());
        assert_eq!(queue.pending_count(), 1);

        // A later enqueue lines up behind the parked step.
        queue.enqueue([record(&log, "fade-in")]);
        assert_eq!(queue.pending_count(), 2);

        let done = parked.lock().take().unwrap();
        done.finish();
        assert_eq!(*log.lock(), vec!["fade-out", "swap", "fade-in"]);
        assert!(!queue.is_running());
    }

    #[test]
    fn test_independent_queues() {
        let first = StepQueue::new();
        let second = StepQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        first.enqueue([step(|_done| {})]);
        second.enqueue([record(&log, "second")]);

        assert!(first.is_running());
        assert_eq!(*log.lock(), vec!["second"]);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_done_after_runs_before_original() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        let done = Done::new(move || l.lock().push("original"));
        let l = log.clone();
        done.after(move || l.lock().push("before")).finish();
        assert_eq!(*log.lock(), vec!["before", "original"]);
    }

    #[test]
    fn test_empty_enqueue_stays_idle() {
        let queue = StepQueue::new();
        queue.enqueue(Vec::new());
        assert!(!queue.is_running());
    }
}
