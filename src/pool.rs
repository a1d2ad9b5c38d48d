//! The worker pool: submission policy, mode semantics, elastic scaling, and
//! the shutdown protocol.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::condvar::Condvar;
use crate::config::{PoolConfig, PoolMode};
use crate::error::PoolError;
use crate::mutex::Mutex;
use crate::queue::Queue;
use crate::result::ResultHandle;
use crate::task::Task;
use crate::worker::{run_worker, Shared};

/// Hard-coded admission deadline: how long `submit` waits for room in the
/// queue before giving up and returning an invalid handle.
const ADMISSION_TIMEOUT: Duration = Duration::from_secs(1);

struct ConfigState {
    config: PoolConfig,
    started: bool,
}

/// A bounded pool of long-lived worker threads that execute submitted
/// closures and hand back a [`ResultHandle`] for each one.
///
/// `R` is the value every submitted task produces; a pool only ever runs
/// tasks of one result type; mix types by submitting `Box<dyn Any + Send>`
/// producers if that's needed.
pub struct Pool<R: Send + 'static> {
    config: Mutex<ConfigState>,
    runtime: Mutex<Option<Arc<Shared<R>>>>,
    next_worker_id: AtomicU64,
}

impl<R: Send + 'static> Pool<R> {
    /// Build an unstarted pool with default configuration (FIXED mode,
    /// effectively unbounded queue, 1024-worker elastic ceiling).
    pub fn new() -> Self {
        Self {
            config: Mutex::new(ConfigState {
                config: PoolConfig::default(),
                started: false,
            }),
            runtime: Mutex::new(None),
            next_worker_id: AtomicU64::new(0),
        }
    }

    /// Set the operating mode. Rejected once the pool has started.
    pub fn set_mode(&self, mode: PoolMode) -> Result<(), PoolError> {
        let mut state = self.config.lock();
        if state.started {
            let err = PoolError::InvalidConfig("cannot set mode after start".into());
            warn!(error = %err, "setMode rejected");
            return Err(err);
        }
        state.config.mode = mode;
        Ok(())
    }

    /// Set the maximum queue depth. Rejected once started, or if `n` is
    /// outside `1..=TASK_QUEUE_MAX_CEILING`.
    pub fn set_task_queue_max(&self, n: usize) -> Result<(), PoolError> {
        let mut state = self.config.lock();
        if state.started {
            let err = PoolError::InvalidConfig("cannot set task_queue_max after start".into());
            warn!(error = %err, "setTaskQueMax rejected");
            return Err(err);
        }
        if let Err(err) = PoolConfig::validate_task_queue_max(n) {
            warn!(error = %err, "setTaskQueMax rejected");
            return Err(err);
        }
        state.config.task_queue_max = n;
        Ok(())
    }

    /// Set the elastic-mode worker ceiling. Rejected once started, outside
    /// ELASTIC mode, or if `n` is outside `1..=THREAD_SIZE_MAX_CEILING`.
    pub fn set_thread_size_max(&self, n: usize) -> Result<(), PoolError> {
        let mut state = self.config.lock();
        if state.started {
            let err = PoolError::InvalidConfig("cannot set thread_size_max after start".into());
            warn!(error = %err, "setThreadSizeMax rejected");
            return Err(err);
        }
        if state.config.mode != PoolMode::Elastic {
            let err = PoolError::WrongMode("setThreadSizeMax requires ELASTIC mode".into());
            warn!(error = %err, "setThreadSizeMax rejected");
            return Err(err);
        }
        if let Err(err) = PoolConfig::validate_thread_size_max(n) {
            warn!(error = %err, "setThreadSizeMax rejected");
            return Err(err);
        }
        state.config.thread_size_max = n;
        Ok(())
    }

    /// Start the pool with `init_thread_size` workers. A typical caller
    /// passes detected hardware concurrency; see [`Self::start_default`] for
    /// a convenience wrapper that does this.
    ///
    /// Single-start is a caller contract; calling this twice returns
    /// [`PoolError::AlreadyStarted`] rather than spawning a second worker
    /// generation.
    pub fn start(&self, init_thread_size: usize) -> Result<(), PoolError> {
        let mut state = self.config.lock();
        if state.started {
            return Err(PoolError::AlreadyStarted);
        }
        state.started = true;
        let config = state.config.clone();
        drop(state);

        let shared = Arc::new(Shared {
            queue: Arc::new(Queue::new(config.task_queue_max)),
            cur_threads: AtomicUsize::new(init_thread_size),
            idle_threads: AtomicUsize::new(init_thread_size),
            init_threads: init_thread_size,
            elastic: config.mode == PoolMode::Elastic,
            shutting_down: AtomicBool::new(false),
            exit: Condvar::new(),
            exit_lock: Mutex::new(()),
            workers: Mutex::new(HashSet::new()),
        });

        for _ in 0..init_thread_size {
            self.spawn_worker(&shared);
        }

        *self.runtime.lock() = Some(shared);
        info!(workers = init_thread_size, mode = ?config.mode, "pool started");
        Ok(())
    }

    /// Start the pool with one worker per detected hardware thread
    /// (`num_cpus::get()`), the default size a caller reaches for when it
    /// has no better basis for `init_thread_size`.
    pub fn start_default(&self) -> Result<(), PoolError> {
        self.start(num_cpus::get())
    }

    fn spawn_worker(&self, shared: &Arc<Shared<R>>) {
        let id = self.next_worker_id.fetch_add(1, Ordering::SeqCst);
        shared.workers.lock().insert(id);
        let worker_shared = Arc::clone(shared);
        let spawned = std::thread::Builder::new()
            .name(format!("taskpool-worker-{id}"))
            .spawn(move || run_worker(id, worker_shared));
        if let Err(err) = spawned {
            error!(error = %err, worker_id = id, "failed to spawn worker thread");
            shared.workers.lock().remove(&id);
        }
    }

    /// Submit a task, returning a handle for its eventual result.
    ///
    /// Blocks up to one second if the queue is full. On admission timeout
    /// (or if the pool was never started) returns an invalid handle whose
    /// [`ResultHandle::wait`] resolves to `None` immediately.
    pub fn submit<F>(&self, body: F) -> ResultHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let shared = match self.runtime.lock().as_ref() {
            Some(shared) => Arc::clone(shared),
            None => {
                warn!("submit called before start; rejecting");
                return ResultHandle::invalid();
            }
        };

        let handle = ResultHandle::valid();
        let task = Task::new(body, handle.clone());

        if let Err(_task) = shared.queue.try_push(task, ADMISSION_TIMEOUT) {
            warn!("admission timed out after {:?}; rejecting submission", ADMISSION_TIMEOUT);
            return ResultHandle::invalid();
        }
        debug!("task admitted");

        if shared.elastic {
            self.maybe_grow(&shared);
        }

        handle
    }

    /// Conservative elastic growth: one new worker per submission that
    /// observes backlog, bounded by the configured ceiling.
    fn maybe_grow(&self, shared: &Arc<Shared<R>>) {
        let backlog = shared.queue.len();
        let idle = shared.idle_threads.load(Ordering::SeqCst);
        let cur = shared.cur_threads.load(Ordering::SeqCst);
        let ceiling = self.config.lock().config.thread_size_max;

        if backlog > idle && cur < ceiling {
            shared.cur_threads.fetch_add(1, Ordering::SeqCst);
            shared.idle_threads.fetch_add(1, Ordering::SeqCst);
            debug!(cur_threads = cur + 1, "growing pool under backlog");
            self.spawn_worker(shared);
        }
    }

    /// Signal every worker to retire and block until the last one exits.
    ///
    /// Tasks still sitting in the queue are dropped, not executed; their
    /// handles remain undelivered. Calling this on a pool that was never
    /// started, or twice, is a harmless no-op.
    pub fn shutdown(&self) {
        let shared = match self.runtime.lock().take() {
            Some(shared) => shared,
            None => return,
        };

        shared.shutting_down.store(true, Ordering::SeqCst);
        shared.queue.wake_all();

        let mut guard = shared.exit_lock.lock();
        shared
            .exit
            .wait_while(&mut guard, |_| shared.cur_threads.load(Ordering::SeqCst) != 0);
        info!("pool shutdown complete");
    }
}

impl<R: Send + 'static> Default for Pool<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + 'static> Drop for Pool<R> {
    /// Unlike a non-blocking teardown, this runs the full shutdown protocol:
    /// every live worker is signaled and the drop does not return until the
    /// population reaches zero, per the destructor contract.
    fn drop(&mut self) {
        self.shutdown();
    }
}
