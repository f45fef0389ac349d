//! Builds [`Pool`]s from validated [`PoolSetConfig`]s.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;

use crate::config::pool::{BackingKind, PoolSetConfig};
use crate::core::pool::{ArrayQueueBacking, Backing, FifoBacking, Pool};
use crate::core::AppResult;

fn backing_from_config(kind: &BackingKind) -> Box<dyn Backing> {
    match kind {
        BackingKind::Fifo => Box::new(FifoBacking::new()),
        BackingKind::ArrayQueue { capacity } => Box::new(ArrayQueueBacking::new(*capacity)),
    }
}

/// Constructs one [`Pool`] per entry in `cfg`, keyed by pool name.
///
/// # Errors
///
/// Returns an error if `cfg` fails validation (see [`PoolSetConfig::validate`]).
pub fn build_pools(cfg: &PoolSetConfig) -> AppResult<HashMap<String, Arc<Pool>>> {
    cfg.validate()
        .map_err(|e| anyhow::anyhow!(e))
        .context("pool-set configuration invalid")?;

    let mut pools = HashMap::with_capacity(cfg.pools.len());
    for (name, pool_cfg) in &cfg.pools {
        let backing = backing_from_config(&pool_cfg.backing);
        let pool = Pool::new(backing, pool_cfg.access_mode.into());
        pools.insert(name.clone(), pool);
    }
    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::pool::{AccessModeConfig, PoolConfig};

    #[test]
    fn builds_one_pool_per_config_entry() {
        let mut pools = HashMap::new();
        pools.insert(
            "ready".to_string(),
            PoolConfig {
                access_mode: AccessModeConfig::Mpmc,
                backing: BackingKind::Fifo,
                default_timeout_secs: 30,
            },
        );
        pools.insert(
            "bounded".to_string(),
            PoolConfig {
                access_mode: AccessModeConfig::Spsc,
                backing: BackingKind::ArrayQueue { capacity: 8 },
                default_timeout_secs: 5,
            },
        );
        let cfg = PoolSetConfig { pools };

        let built = build_pools(&cfg).unwrap();
        assert_eq!(built.len(), 2);
        assert_eq!(built["ready"].size(), 0);
        assert_eq!(built["bounded"].access_mode(), crate::core::AccessMode::Spsc);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = PoolSetConfig {
            pools: HashMap::new(),
        };
        assert!(build_pools(&cfg).is_err());
    }
}
