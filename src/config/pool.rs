//! Declarative configuration for building [`crate::core::Pool`]s.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::pool::AccessMode;

/// Serializable mirror of [`AccessMode`] (kept distinct from the core type so
/// the wire/config format doesn't change shape if the core enum grows
/// non-serializable variants later).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessModeConfig {
    /// A single native thread both produces and consumes.
    Private,
    /// A single producer, a single consumer.
    Spsc,
    /// Multiple producers, a single consumer.
    Mpsc,
    /// A single producer, multiple consumers.
    Spmc,
    /// Multiple producers, multiple consumers; neither identity is checked.
    Mpmc,
}

impl From<AccessModeConfig> for AccessMode {
    fn from(cfg: AccessModeConfig) -> Self {
        match cfg {
            AccessModeConfig::Private => AccessMode::Private,
            AccessModeConfig::Spsc => AccessMode::Spsc,
            AccessModeConfig::Mpsc => AccessMode::Mpsc,
            AccessModeConfig::Spmc => AccessMode::Spmc,
            AccessModeConfig::Mpmc => AccessMode::Mpmc,
        }
    }
}

/// Which backing a configured pool should be built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackingKind {
    /// The default mutex/condvar-guarded `VecDeque` FIFO.
    Fifo,
    /// A fixed-capacity lock-free `ArrayQueue`.
    ArrayQueue {
        /// Maximum number of units the queue may hold at once.
        capacity: usize,
    },
}

/// Configuration for a single pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Producer/consumer access discipline to enforce.
    pub access_mode: AccessModeConfig,
    /// Backing storage strategy.
    pub backing: BackingKind,
    /// Default absolute-deadline horizon for `pop_timedwait`, in seconds,
    /// when a caller doesn't supply its own deadline.
    pub default_timeout_secs: u64,
}

impl PoolConfig {
    /// Validates this pool's configuration.
    ///
    /// # Errors
    ///
    /// Returns an error message if `default_timeout_secs` is zero or a
    /// configured `ArrayQueue` capacity is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_timeout_secs == 0 {
            return Err("default_timeout_secs must be greater than 0".into());
        }
        if let BackingKind::ArrayQueue { capacity } = &self.backing {
            if *capacity == 0 {
                return Err("array_queue capacity must be greater than 0".into());
            }
        }
        Ok(())
    }

    /// The default timeout as a [`Duration`].
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

/// A named set of pool configurations, as would be loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSetConfig {
    /// Map of pool name to configuration.
    pub pools: HashMap<String, PoolConfig>,
}

impl PoolSetConfig {
    /// Validates every pool and ensures at least one pool is defined.
    ///
    /// # Errors
    ///
    /// Returns an error message naming the first invalid pool, or stating
    /// that no pools were configured.
    pub fn validate(&self) -> Result<(), String> {
        if self.pools.is_empty() {
            return Err("at least one pool must be defined".into());
        }
        for (name, pool) in &self.pools {
            pool.validate()
                .map_err(|e| format!("pool `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parses a pool-set configuration from a JSON string and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error message on malformed JSON or failed validation.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: PoolSetConfig =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
