//! Lock helpers for the interior-mutable parts of references.
//!
//! Readers never fail: a poisoned lock still holds the last fully written value because every
//! writer replaces the value in a single assignment. Public setters report poisoning as
//! [`crate::Error::LockError`]; internal bookkeeping (parameter numbering) recovers instead.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Error, Result};

/// Acquire a read guard, recovering the value of a poisoned lock
pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Acquire a write guard for internal bookkeeping, recovering a poisoned lock
pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Clone the value behind a lock
pub(crate) fn read_cloned<T: Clone>(lock: &RwLock<T>) -> T {
    read_lock(lock).clone()
}

/// Replace the value behind a lock
///
/// # Errors
/// Returns [`Error::LockError`] if the lock is poisoned
pub(crate) fn replace<T>(lock: &RwLock<T>, value: T) -> Result<()> {
    let mut guard = lock.write().map_err(|_| Error::LockError)?;
    *guard = value;
    Ok(())
}
