//! The task entity: an opaque unit of work paired with the result handle it
//! will publish into.

use crate::result::ResultHandle;

/// A unit of work submitted to a [`crate::pool::Pool`].
///
/// Bundles the caller's closure with the [`ResultHandle`] clone it will
/// publish a value into. `execute` consumes the task so its body can only
/// ever run once.
pub(crate) struct Task<R> {
    body: Box<dyn FnOnce() -> R + Send>,
    handle: ResultHandle<R>,
}

impl<R> Task<R>
where
    R: Send + 'static,
{
    pub(crate) fn new<F>(body: F, handle: ResultHandle<R>) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
    {
        Self {
            body: Box::new(body),
            handle,
        }
    }

    /// Run the body and publish its return value into the attached handle.
    ///
    /// If the body panics, the panic propagates to the caller (the worker
    /// loop), which is responsible for isolating task-body failures so a
    /// panicking task cannot take down the pool's bookkeeping with it.
    pub(crate) fn execute(self) {
        let value = (self.body)();
        self.handle.publish(value);
    }
}
