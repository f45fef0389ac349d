//! # abt_sync
//!
//! A user-level thread (ULT) pool and synchronization core patterned after
//! Argobots: cooperatively scheduled work units ("ULTs") multiplexed onto
//! native OS threads ("execution streams"), queued in pluggable pools and
//! coordinated through a condition variable that can block and wake both
//! ULTs and plain native threads in one FIFO waiter list.
//!
//! ## What's here
//!
//! - [`core::Pool`] — an ordered queue of work units with pluggable storage
//!   ([`core::FifoBacking`], [`core::ArrayQueueBacking`]), producer/consumer
//!   access control, and retention/blocked/migration accounting.
//! - [`core::Ult`] — the ULT descriptor: an atomic scheduling state plus a
//!   non-owning back-reference to the pool it returns to when readied.
//! - [`Condvar`] — the FIFO waiter queue built on top of the pool core,
//!   distinguishing ULT waiters (re-pushed into their home pool on wake) from
//!   external native-thread waiters (woken by flipping a polled flag).
//! - [`core::Scheduler`] — the narrow collaborator interface a scheduler
//!   implements against a retained pool; policy and context-switch mechanics
//!   are out of scope for this crate.
//!
//! ES lifecycle, scheduler policy loops, and stack-switch mechanics are
//! treated as external collaborators here — this crate provides the queue and
//! synchronization primitives they're built on, not the scheduler itself.
//!
//! ## Quick example
//!
//! ```
//! use abt_sync::core::{AccessMode, FifoBacking, Pool, Ult};
//! use std::sync::Arc;
//!
//! let pool = Pool::new(Box::new(FifoBacking::new()), AccessMode::Mpmc);
//! let ult = Ult::new(&pool);
//! pool.push(Arc::clone(&ult), None).unwrap();
//! assert_eq!(pool.size(), 1);
//!
//! let popped = pool.pop().unwrap();
//! assert_eq!(popped.id(), ult.id());
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core pool, ULT-descriptor, and scheduler-collaborator abstractions.
pub mod core;
/// Configuration models for pools and backing strategies.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Shared utilities: logging bootstrap and deadline conversions.
pub mod util;

mod condvar;
mod mutex;
mod once;
mod rwlock;

pub use condvar::Condvar;
pub use mutex::{MappedMutexGuard, Mutex, MutexGuard};
pub use once::{Once, OnceCell};
pub use rwlock::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard,
    RwLockUpgradableReadGuard, RwLockWriteGuard,
};
