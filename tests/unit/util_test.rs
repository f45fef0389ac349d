//! Tests for shared utilities: epoch-seconds deadline conversions.

use abt_sync::util::{from_epoch_secs, to_epoch_secs};
use std::time::Duration;

#[test]
fn epoch_seconds_round_trip() {
    let secs = 1_800_000_000;
    assert_eq!(to_epoch_secs(from_epoch_secs(secs)), secs);
}

#[test]
fn zero_epoch_seconds_is_unix_epoch() {
    let time = from_epoch_secs(0);
    assert_eq!(time, std::time::UNIX_EPOCH);
}

#[test]
fn deadline_sixty_seconds_out_is_in_the_future() {
    let now = std::time::SystemTime::now();
    let deadline = from_epoch_secs(to_epoch_secs(now) + 60);
    assert!(deadline > now - Duration::from_secs(1));
}
