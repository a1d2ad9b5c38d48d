//! Error types for pool configuration and lifecycle.

use thiserror::Error;

/// Errors produced by [`crate::pool::Pool`] configuration and lifecycle methods.
///
/// Task admission failures are not represented here; per the pool's submission
/// policy they surface as an invalid [`crate::result::ResultHandle`] instead,
/// so a caller that only cares about results never has to match on an error
/// enum just to discover its task was dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// A setter was given an out-of-range value, or was called with the pool
    /// already running.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `setThreadSizeMax` was called on a pool not in ELASTIC mode.
    #[error("wrong mode: {0}")]
    WrongMode(String),

    /// `start` was called on a pool that has already been started.
    #[error("pool already started")]
    AlreadyStarted,
}
