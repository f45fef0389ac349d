//! Configuration models for pools, backing strategies, and timeouts.

pub mod pool;

pub use pool::{AccessModeConfig, BackingKind, PoolConfig, PoolSetConfig};
