//! Shared utilities: logging bootstrap and deadline conversions.

pub mod telemetry;
pub mod time;

pub use telemetry::init_tracing;
pub use time::{from_epoch_secs, to_epoch_secs};
