//! Lock-free 32-bit signed counters used for pool and scheduler accounting.

use std::sync::atomic::{AtomicI32, Ordering};

/// A 32-bit signed atomic counter.
///
/// Every load/store method names its own ordering explicitly rather than picking
/// one default, since callers in [`crate::core::pool`] mix relaxed bookkeeping
/// with acquire-ordered reads that feed into [`crate::core::pool::Pool::total_size`].
#[derive(Debug, Default)]
pub struct AtomicCounter(AtomicI32);

impl AtomicCounter {
    /// Creates a counter initialized to `value`.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(AtomicI32::new(value))
    }

    /// Relaxed load.
    pub fn load_relaxed(&self) -> i32 {
        self.0.load(Ordering::Relaxed)
    }

    /// Acquire load.
    pub fn load_acquire(&self) -> i32 {
        self.0.load(Ordering::Acquire)
    }

    /// Relaxed store.
    pub fn store_relaxed(&self, value: i32) {
        self.0.store(value, Ordering::Relaxed);
    }

    /// Atomically increments by one, returning the new value. Uses `AcqRel` so the
    /// increment composes correctly whether the caller needs the acquire or the
    /// release half of the operation.
    pub fn increment(&self) -> i32 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Atomically decrements by one, returning the new value.
    pub fn decrement(&self) -> i32 {
        self.0.fetch_sub(1, Ordering::AcqRel) - 1
    }
}
