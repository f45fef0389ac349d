//! Conversions between the abstract API's "seconds since epoch" deadlines and
//! `std::time::SystemTime`, used by [`crate::core::pool::Pool::pop_timedwait`].

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The largest epoch-seconds value guaranteed not to overflow `SystemTime` on
/// any supported platform (the range `i64` seconds can express).
const FAR_FUTURE_SECS: u64 = i64::MAX as u64;

/// Converts an absolute deadline expressed as seconds since the Unix epoch
/// into a `SystemTime`. Saturates to a far-future `SystemTime` rather than
/// panicking when `secs` overflows it, since this feeds the public
/// `pop_timedwait` deadline surface, which accepts an arbitrary `u64`.
#[must_use]
pub fn from_epoch_secs(secs: u64) -> SystemTime {
    UNIX_EPOCH
        .checked_add(Duration::from_secs(secs))
        .or_else(|| UNIX_EPOCH.checked_add(Duration::from_secs(FAR_FUTURE_SECS)))
        .unwrap_or(UNIX_EPOCH)
}

/// Converts a `SystemTime` back into seconds since the Unix epoch, saturating
/// to zero for timestamps before the epoch rather than panicking.
#[must_use]
pub fn to_epoch_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
