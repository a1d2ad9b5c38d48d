//! # taskpool
//!
//! A general-purpose worker pool: a bounded population of long-lived OS
//! threads that execute submitted closures and hand back a one-shot handle
//! for each result.
//!
//! The engine is the coordination between submitters and workers around a
//! bounded task queue, the two operating modes ([`PoolMode::Fixed`] and
//! [`PoolMode::Elastic`]) with their distinct worker-lifecycle policies, the
//! result-handoff mechanism that decouples a result's lifetime from the
//! submitter's stack, and an orderly shutdown protocol that guarantees every
//! accepted task either runs or is dropped before the pool is destroyed.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use taskpool::Pool;
//!
//! let pool: Pool<u32> = Pool::new();
//! pool.start(4).unwrap();
//!
//! let handle = pool.submit(|| 2 + 2);
//! assert_eq!(handle.wait(), Some(4));
//! ```
//!
//! ## Elastic mode
//!
//! ```rust,no_run
//! use taskpool::{Pool, PoolMode};
//!
//! let pool: Pool<()> = Pool::new();
//! pool.set_mode(PoolMode::Elastic).unwrap();
//! pool.set_thread_size_max(16).unwrap();
//! pool.start(2).unwrap();
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// The bounded-buffer synchronization primitive the queue is built on.
mod condvar;
/// Pool configuration: operating mode and tunable thresholds.
pub mod config;
/// Error types for pool configuration and lifecycle.
pub mod error;
/// `parking_lot` mutex re-export used throughout the crate.
mod mutex;
/// The bounded task queue shared between submitters and workers.
mod queue;
/// The worker pool itself.
pub mod pool;
/// The one-shot rendezvous carrying a task's result.
pub mod result;
/// The opaque unit of work submitted to a pool.
mod task;
/// Shared utilities (logging setup).
pub mod util;
/// The long-lived worker loop.
mod worker;

pub use condvar::Condvar;
pub use config::PoolMode;
pub use error::PoolError;
pub use mutex::{MappedMutexGuard, Mutex, MutexGuard};
pub use pool::Pool;
pub use result::ResultHandle;
