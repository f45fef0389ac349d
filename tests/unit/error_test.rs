//! Tests for the stable `SyncError` error codes.

use abt_sync::core::SyncError;

#[test]
fn mem_error_message() {
    assert_eq!(SyncError::Mem.to_string(), "allocation failed");
}

#[test]
fn inv_mutex_error_message() {
    assert_eq!(
        SyncError::InvMutex.to_string(),
        "condition variable is bound to a different mutex"
    );
}

#[test]
fn inv_pool_access_error_message() {
    assert_eq!(
        SyncError::InvPoolAccess.to_string(),
        "operation not permitted by pool access mode"
    );
}

#[test]
fn not_found_error_message() {
    assert_eq!(SyncError::NotFound.to_string(), "unit not present in pool");
}

#[test]
fn errors_are_copy_and_comparable() {
    let a = SyncError::Cond;
    let b = a;
    assert_eq!(a, b);
    assert_ne!(SyncError::Cond, SyncError::Mem);
}
