//! Mutex implementation
//!
//! This module provides a high-performance mutual exclusion primitive built on top of
//! the battle-tested `parking_lot` crate. It is a thin newtype rather than a bare
//! re-export so it can additionally expose the `spinlock`/`unlock`/`equal` contract
//! the condition variable in this crate relies on: `Condvar::wait` binds to whichever
//! mutex first waits on it and rejects a later `wait` against a different one, which
//! requires a way to ask two mutexes "are you the same lock" without comparing guards.
//!
//! # Features
//!
//! - Fair lock acquisition
//! - No poisoning on panic
//! - Compact memory footprint
//! - Fast lock/unlock operations
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```
//! use abt_sync::Mutex;
//!
//! let mutex = Mutex::new(0);
//! *mutex.lock() = 10;
//! assert_eq!(*mutex.lock(), 10);
//! ```
//!
//! Concurrent access:
//!
//! ```
//! use abt_sync::Mutex;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let mutex = Arc::new(Mutex::new(0));
//! let mut handles = vec![];
//!
//! for _ in 0..10 {
//!     let mutex = Arc::clone(&mutex);
//!     handles.push(thread::spawn(move || {
//!         let mut num = mutex.lock();
//!         *num += 1;
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(*mutex.lock(), 10);
//! ```

/// A mutual-exclusion lock wrapping `parking_lot::Mutex`.
#[derive(Default)]
pub struct Mutex<T: ?Sized> {
    inner: parking_lot::Mutex<T>,
}

/// Guard returned by [`Mutex::lock`], [`Mutex::try_lock`] and [`Mutex::spinlock`].
pub type MutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;

/// A mapped guard produced by projecting a [`MutexGuard`] onto a field.
pub type MappedMutexGuard<'a, T> = parking_lot::MappedMutexGuard<'a, T>;

impl<T> Mutex<T> {
    /// Creates a new mutex wrapping `value`.
    pub const fn new(value: T) -> Self {
        Self {
            inner: parking_lot::Mutex::new(value),
        }
    }

    /// Consumes the mutex, returning the underlying data.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: ?Sized> Mutex<T> {
    /// Acquires the lock, blocking the calling thread until it is available.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    /// Acquires the lock by spinning rather than parking the calling thread.
    /// Intended for the condition variable's own short waiter-list critical
    /// section, where the hold time is a handful of instructions and parking
    /// would cost more than it saves.
    pub fn spinlock(&self) -> MutexGuard<'_, T> {
        loop {
            if let Some(guard) = self.inner.try_lock() {
                return guard;
            }
            std::hint::spin_loop();
        }
    }

    /// Attempts to acquire the lock without blocking.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.inner.try_lock()
    }

    /// Releases a guard previously obtained from this mutex. Equivalent to
    /// dropping it, spelled out for parity with the abstract `unlock`
    /// operation in the collaborator contract this type implements.
    pub fn unlock(guard: MutexGuard<'_, T>) {
        drop(guard);
    }

    /// Returns a mutable reference to the underlying data, bypassing the lock
    /// (sound because `&mut self` proves exclusive access).
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// Returns `true` if the mutex is currently locked.
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// A stable identity for this mutex, suitable for the `equal` comparison
    /// in the collaborator contract. Two `Mutex` values compare equal under
    /// [`Mutex::equal`] iff they are the same object.
    pub fn id(&self) -> usize {
        std::ptr::addr_of!(self.inner) as usize
    }

    /// Identity comparison between two mutexes, matching the collaborator
    /// contract's `equal` operation.
    pub fn equal(&self, other: &Mutex<T>) -> bool {
        self.id() == other.id()
    }
}
