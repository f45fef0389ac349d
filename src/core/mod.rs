//! Core pool, ULT-descriptor, and scheduler-collaborator abstractions.

pub mod counter;
pub mod error;
pub mod pool;
pub mod scheduler;
pub mod ult;

pub use counter::AtomicCounter;
pub use error::{AppResult, SyncError};
pub use pool::{AccessMode, ArrayQueueBacking, Backing, FifoBacking, Pool};
pub use scheduler::{Scheduler, SinglePoolScheduler};
pub use ult::{current_ult, with_current_ult, Ult, UltState, Unit};
