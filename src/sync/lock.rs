// src/sync/lock.rs

//! Lock handles shared between a caller and a guarded worker.
//!
//! Acquisition and release are separate, fallible steps so a worker can
//! record which of the two went wrong. A guard returned by `acquire` must be
//! handed back to `release` on the same handle.

use serde::Deserialize;
use thiserror::Error;

/// How a worker tries to take the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquireMode {
    /// Wait until the lock is free.
    #[default]
    Blocking,
    /// Fail with [`LockError::WouldBlock`] if the lock is held.
    NonBlocking,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("lock is held by another owner")]
    WouldBlock,

    #[error("lock is poisoned")]
    Poisoned,

    #[error("lock operation failed: {0}")]
    Failed(String),
}

/// A mutual-exclusion primitive with explicit acquire and release steps.
pub trait LockHandle: Send + Sync {
    type Guard<'a>
    where
        Self: 'a;

    fn acquire(&self, mode: AcquireMode) -> Result<Self::Guard<'_>, LockError>;

    fn release<'a>(&'a self, guard: Self::Guard<'a>) -> Result<(), LockError>;
}

impl<T: Send> LockHandle for std::sync::Mutex<T> {
    type Guard<'a>
        = std::sync::MutexGuard<'a, T>
    where
        Self: 'a;

    fn acquire(&self, mode: AcquireMode) -> Result<Self::Guard<'_>, LockError> {
        match mode {
            AcquireMode::Blocking => self.lock().map_err(|_| LockError::Poisoned),
            AcquireMode::NonBlocking => self.try_lock().map_err(|err| match err {
                std::sync::TryLockError::WouldBlock => LockError::WouldBlock,
                std::sync::TryLockError::Poisoned(_) => LockError::Poisoned,
            }),
        }
    }

    fn release<'a>(&'a self, guard: Self::Guard<'a>) -> Result<(), LockError> {
        drop(guard);
        Ok(())
    }
}

/// `Blocking` uses `blocking_lock`, so it must not be called from inside an
/// async context. Guarded workers run on their own OS thread, which is fine.
impl<T: Send> LockHandle for tokio::sync::Mutex<T> {
    type Guard<'a>
        = tokio::sync::MutexGuard<'a, T>
    where
        Self: 'a;

    fn acquire(&self, mode: AcquireMode) -> Result<Self::Guard<'_>, LockError> {
        match mode {
            AcquireMode::Blocking => Ok(self.blocking_lock()),
            AcquireMode::NonBlocking => self.try_lock().map_err(|_| LockError::WouldBlock),
        }
    }

    fn release<'a>(&'a self, guard: Self::Guard<'a>) -> Result<(), LockError> {
        drop(guard);
        Ok(())
    }
}
