//! Error types shared by the pool and condition-variable core.

use thiserror::Error;

/// Stable error codes for pool and condition-variable operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// Allocation failed, or a fixed-capacity backing is full.
    #[error("allocation failed")]
    Mem,
    /// A condition variable wait was attempted against a mutex different from the
    /// one currently bound to it.
    #[error("condition variable is bound to a different mutex")]
    InvMutex,
    /// A pool operation was attempted by a producer or consumer not permitted by
    /// the pool's access mode.
    #[error("operation not permitted by pool access mode")]
    InvPoolAccess,
    /// A condition-variable operation was issued from a context lacking a ULT when
    /// one was expected.
    #[error("invalid context for condition variable operation")]
    Cond,
    /// `Pool::remove` was called with a unit that is not currently queued.
    #[error("unit not present in pool")]
    NotFound,
}

/// Application-facing result using `anyhow` for higher-level contexts that
/// aggregate heterogeneous error sources (configuration validation, pool-set
/// construction).
pub type AppResult<T> = Result<T, anyhow::Error>;
