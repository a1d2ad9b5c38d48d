//! The long-lived worker loop: pull a task, run it outside the queue lock,
//! optionally self-retire.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::condvar::Condvar;
use crate::mutex::Mutex;
use crate::queue::{PopOutcome, Queue};
use crate::task::Task;

const ELASTIC_WAIT_SLICE: Duration = Duration::from_secs(1);
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// The counters and signals a worker shares with the pool, independent of
/// any particular worker's identity.
pub(crate) struct Shared<R> {
    pub(crate) queue: Arc<Queue<Task<R>>>,
    pub(crate) cur_threads: AtomicUsize,
    pub(crate) idle_threads: AtomicUsize,
    pub(crate) init_threads: usize,
    pub(crate) elastic: bool,
    pub(crate) shutting_down: AtomicBool,
    pub(crate) exit: Condvar,
    pub(crate) exit_lock: Mutex<()>,
    pub(crate) workers: Mutex<HashSet<u64>>,
}

/// Run one worker's lifetime. Returns when the worker has retired, either
/// because the pool is shutting down or (ELASTIC only) because it sat idle
/// past the timeout with the population above the floor.
pub(crate) fn run_worker<R>(id: u64, shared: Arc<Shared<R>>)
where
    R: Send + 'static,
{
    debug!(worker_id = id, "worker started");
    let mut last_active = Instant::now();

    loop {
        let wait_slice = if shared.elastic {
            Some(ELASTIC_WAIT_SLICE)
        } else {
            None
        };

        let outcome = shared
            .queue
            .pop_blocking(wait_slice, || shared.shutting_down.load(Ordering::SeqCst));

        match outcome {
            PopOutcome::ShouldExit => {
                retire(&shared, id);
                debug!(worker_id = id, "worker exiting: shutdown");
                return;
            }
            PopOutcome::TimedOut => {
                if shared.elastic
                    && last_active.elapsed() > IDLE_TIMEOUT
                    && shared.cur_threads.load(Ordering::SeqCst) > shared.init_threads
                {
                    retire(&shared, id);
                    debug!(worker_id = id, "worker exiting: idle reclamation");
                    return;
                }
                continue;
            }
            PopOutcome::Task(task) => {
                shared.idle_threads.fetch_sub(1, Ordering::SeqCst);
                let result = catch_unwind(AssertUnwindSafe(|| task.execute()));
                if result.is_err() {
                    warn!(worker_id = id, "task body panicked; handle left undelivered");
                }
                shared.idle_threads.fetch_add(1, Ordering::SeqCst);
                last_active = Instant::now();
            }
        }
    }
}

/// Remove this worker from the map and decrement both population counters.
///
/// A worker reaching this point is, by definition, currently idle (it was
/// blocked in `pop_blocking` with no task in hand), so both counters must
/// come down together to preserve `idleThreads <= curThreads`. The decrement
/// and the notify happen under `exit_lock`, the same mutex the pool holds
/// while re-checking `curThreads == 0` in its shutdown wait, so the
/// notification can't be lost between the pool's check and its wait.
fn retire<R>(shared: &Shared<R>, id: u64) {
    shared.workers.lock().remove(&id);
    let _guard = shared.exit_lock.lock();
    shared.cur_threads.fetch_sub(1, Ordering::SeqCst);
    shared.idle_threads.fetch_sub(1, Ordering::SeqCst);
    shared.exit.notify_all();
}
