//! The bounded task queue shared between submitters and workers.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::condvar::Condvar;
use crate::mutex::Mutex;

/// What a blocking pop produced.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PopOutcome<T> {
    /// An item was dequeued.
    Task(T),
    /// The queue is empty and the caller's exit condition became true; the
    /// worker should retire instead of continuing to wait.
    ShouldExit,
    /// The wait slice elapsed with no item and no exit request; the caller
    /// decides what to do next (an elastic worker uses this to re-check
    /// whether it has been idle long enough to retire).
    TimedOut,
}

struct State<T> {
    items: VecDeque<T>,
    max: usize,
}

/// A `Mutex` + `Condvar`-backed bounded FIFO, deliberately not a channel: the
/// pool's elastic growth decision needs to inspect queue depth together with
/// the worker population under one critical section, which an opaque
/// channel's `send`/`recv` can't expose.
pub(crate) struct Queue<T> {
    state: Mutex<State<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> Queue<T> {
    pub(crate) fn new(max: usize) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                max,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    /// Current number of queued, not-yet-dequeued items.
    pub(crate) fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Push `item`, waiting up to `timeout` for room if the queue is full.
    ///
    /// Returns `false` if `timeout` elapsed with the queue still full, in
    /// which case `item` is handed back to the caller unconsumed.
    pub(crate) fn try_push(&self, item: T, timeout: Duration) -> Result<(), T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if state.items.len() < state.max {
                state.items.push_back(item);
                drop(state);
                self.not_empty.notify_one();
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(item);
            }
            self.not_full.wait_for(&mut state, deadline - now);
        }
    }

    /// Pop the front item, waiting up to `wait_slice` at a time and
    /// re-checking `should_exit` between slices.
    ///
    /// A `None` `wait_slice` waits indefinitely (used in FIXED mode, where a
    /// worker never self-retires on idleness).
    pub(crate) fn pop_blocking(
        &self,
        wait_slice: Option<Duration>,
        should_exit: impl Fn() -> bool,
    ) -> PopOutcome<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                let residual = !state.items.is_empty();
                drop(state);
                self.not_full.notify_one();
                if residual {
                    self.not_empty.notify_all();
                }
                return PopOutcome::Task(item);
            }
            if should_exit() {
                return PopOutcome::ShouldExit;
            }
            match wait_slice {
                Some(slice) => {
                    let timed_out = self.not_empty.wait_for(&mut state, slice);
                    if timed_out {
                        return PopOutcome::TimedOut;
                    }
                }
                None => self.not_empty.wait(&mut state),
            }
        }
    }

    /// Wake every thread blocked in `pop_blocking` without enqueuing
    /// anything, so each can re-evaluate its `should_exit` condition.
    pub(crate) fn wake_all(&self) {
        self.not_empty.notify_all();
    }
}
