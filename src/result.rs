//! The one-shot rendezvous a submitted task publishes its value into.

use std::mem;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::condvar::Condvar;
use crate::mutex::Mutex;

enum Slot<R> {
    Pending,
    Ready(R),
}

struct Inner<R> {
    slot: Mutex<Slot<R>>,
    ready: Condvar,
}

/// A handle to the value a [`crate::pool::Pool`] task will eventually produce.
///
/// Cloning a handle shares the same underlying rendezvous: the clone keeps
/// the result reachable even after the submitter's original handle has gone
/// out of scope, but only one clone should ever call [`wait`](Self::wait) or
/// [`wait_timeout`](Self::wait_timeout) — consuming the value takes it out of
/// the slot, so a second waiter would block forever.
///
/// A handle returned for a task that could not be admitted (the submission
/// queue was full past the admission timeout) carries no rendezvous at all;
/// waiting on it returns `None` immediately rather than blocking.
pub struct ResultHandle<R> {
    inner: Option<Arc<Inner<R>>>,
}

impl<R> ResultHandle<R> {
    /// Build a handle backed by a live rendezvous, for a task that was
    /// admitted to the queue.
    pub(crate) fn valid() -> Self {
        Self {
            inner: Some(Arc::new(Inner {
                slot: Mutex::new(Slot::Pending),
                ready: Condvar::new(),
            })),
        }
    }

    /// Build a handle for a task that was never admitted.
    pub(crate) fn invalid() -> Self {
        Self { inner: None }
    }

    /// Whether this handle is backed by a live rendezvous.
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// Publish the computed value. A no-op on an invalid handle.
    pub(crate) fn publish(&self, value: R) {
        let Some(inner) = self.inner.as_ref() else {
            return;
        };
        let mut slot = inner.slot.lock();
        *slot = Slot::Ready(value);
        drop(slot);
        inner.ready.notify_all();
    }

    /// Block until the task's value is published, or return `None`
    /// immediately if this handle was never admitted.
    pub fn wait(self) -> Option<R> {
        let inner = self.inner?;
        let mut slot = inner.slot.lock();
        inner
            .ready
            .wait_while(&mut slot, |s| matches!(s, Slot::Pending));
        match mem::replace(&mut *slot, Slot::Pending) {
            Slot::Ready(value) => Some(value),
            Slot::Pending => None,
        }
    }

    /// Block until the task's value is published or `timeout` elapses.
    ///
    /// Returns `None` both when the handle was never admitted and when the
    /// deadline passes before a value arrives; the two cases are
    /// indistinguishable to the caller by design, matching the behavior of
    /// an admission-timeout handle.
    pub fn wait_timeout(self, timeout: Duration) -> Option<R> {
        let inner = self.inner?;
        let deadline = Instant::now() + timeout;
        let mut slot = inner.slot.lock();
        loop {
            if !matches!(*slot, Slot::Pending) {
                break;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            inner.ready.wait_for(&mut slot, deadline - now);
        }
        match mem::replace(&mut *slot, Slot::Pending) {
            Slot::Ready(value) => Some(value),
            Slot::Pending => None,
        }
    }
}

impl<R> Clone for ResultHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn publish_then_wait_returns_value() {
        let handle = ResultHandle::valid();
        handle.publish(7);
        assert_eq!(handle.wait(), Some(7));
    }

    #[test]
    fn invalid_handle_wait_returns_none_immediately() {
        let handle = ResultHandle::<i32>::invalid();
        assert_eq!(handle.wait(), None);
    }

    #[test]
    fn wait_timeout_respects_deadline_when_never_published() {
        let handle = ResultHandle::<i32>::valid();
        let start = Instant::now();
        let value = handle.wait_timeout(Duration::from_millis(30));
        assert_eq!(value, None);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn wait_timeout_returns_value_published_before_deadline() {
        let handle = ResultHandle::valid();
        let publisher = handle.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            publisher.publish(99);
        });
        assert_eq!(handle.wait_timeout(Duration::from_secs(5)), Some(99));
    }

    #[test]
    fn clone_survives_after_original_dropped() {
        let handle = ResultHandle::valid();
        let kept = handle.clone();
        handle.publish(1);
        drop(handle);
        assert_eq!(kept.wait(), Some(1));
    }

    #[test]
    fn publish_on_invalid_handle_is_harmless() {
        let handle = ResultHandle::<i32>::invalid();
        handle.publish(5);
        assert_eq!(handle.wait(), None);
    }
}
