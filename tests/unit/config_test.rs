//! Tests for pool configuration validation and parsing.

use abt_sync::config::{AccessModeConfig, BackingKind, PoolConfig, PoolSetConfig};
use std::collections::HashMap;

fn fifo_config() -> PoolConfig {
    PoolConfig {
        access_mode: AccessModeConfig::Mpmc,
        backing: BackingKind::Fifo,
        default_timeout_secs: 60,
    }
}

#[test]
fn pool_config_validates() {
    assert!(fifo_config().validate().is_ok());
}

#[test]
fn pool_config_rejects_zero_timeout() {
    let mut cfg = fifo_config();
    cfg.default_timeout_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn pool_config_rejects_zero_capacity_array_queue() {
    let mut cfg = fifo_config();
    cfg.backing = BackingKind::ArrayQueue { capacity: 0 };
    assert!(cfg.validate().is_err());
}

#[test]
fn pool_set_config_validates_with_one_pool() {
    let mut pools = HashMap::new();
    pools.insert("pool1".to_string(), fifo_config());
    let config = PoolSetConfig { pools };
    assert!(config.validate().is_ok());
}

#[test]
fn pool_set_config_rejects_empty_pools() {
    let config = PoolSetConfig {
        pools: HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn pool_set_config_from_json() {
    let json = r#"{
        "pools": {
            "pool1": {
                "access_mode": "mpmc",
                "backing": "fifo",
                "default_timeout_secs": 60
            }
        }
    }"#;

    let config = PoolSetConfig::from_json_str(json);
    assert!(config.is_ok());
    assert_eq!(config.unwrap().pools.len(), 1);
}

#[test]
fn pool_set_config_from_json_rejects_invalid_pool() {
    let json = r#"{
        "pools": {
            "pool1": {
                "access_mode": "spsc",
                "backing": { "array_queue": { "capacity": 0 } },
                "default_timeout_secs": 60
            }
        }
    }"#;

    assert!(PoolSetConfig::from_json_str(json).is_err());
}
