//! Scheduler interface: the collaborator that acquires and drains a pool.
//!
//! Scheduler policy (how a scheduler picks among several pools, how it
//! interleaves ULTs on one execution stream) is out of scope for this core —
//! see §1 of the specification. What belongs here is the narrow call sequence
//! a scheduler makes against a [`Pool`] it holds: `retain` on acquisition,
//! `pop`/`pop_timedwait` to drain it, `size` to observe depth, `release` when
//! done.

use std::sync::Arc;
use std::time::SystemTime;

use crate::core::pool::Pool;
use crate::core::ult::Unit;

/// A scheduler that has acquired one pool and draws runnable units from it.
///
/// Default method bodies simply forward to the held [`Pool`]; a real scheduler
/// would wrap additional policy (which pool to poll next, how long to idle in
/// `pop_timedwait` before trying another pool) around these calls.
pub trait Scheduler {
    /// The pool this scheduler draws runnable units from.
    fn pool(&self) -> &Arc<Pool>;

    /// Acquires the pool, incrementing its scheduler refcount.
    fn retain(&self) {
        self.pool().retain();
    }

    /// Releases the pool, decrementing its scheduler refcount.
    ///
    /// # Panics
    ///
    /// Panics if the pool's refcount was already zero (see [`Pool::release`]).
    fn release(&self) -> i32 {
        self.pool().release()
    }

    /// Pops the next runnable unit without blocking.
    fn pop(&self) -> Option<Unit> {
        self.pool().pop()
    }

    /// Blocks the calling native thread (not a ULT) until a unit is available
    /// or `deadline` elapses.
    fn pop_timedwait(&self, deadline: SystemTime) -> Option<Unit> {
        self.pool().pop_timedwait(deadline)
    }

    /// Observes the backing's queued count only (not `num_blocked`/`num_migrations`).
    fn size(&self) -> usize {
        self.pool().size()
    }
}

/// The simplest possible scheduler: holds exactly one pool and nothing else.
/// Useful for tests and as a minimal example of implementing [`Scheduler`].
pub struct SinglePoolScheduler {
    pool: Arc<Pool>,
}

impl SinglePoolScheduler {
    /// Retains `pool` and returns a scheduler bound to it.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        pool.retain();
        Self { pool }
    }
}

impl Scheduler for SinglePoolScheduler {
    fn pool(&self) -> &Arc<Pool> {
        &self.pool
    }
}

impl Drop for SinglePoolScheduler {
    fn drop(&mut self) {
        self.pool.release();
    }
}
