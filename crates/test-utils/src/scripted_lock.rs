use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sysexec::sync::{AcquireMode, LockError, LockHandle};

/// A fake lock whose acquire and release steps can be forced to fail.
///
/// Counts every attempt so tests can check that a failed acquisition is
/// never followed by a release.
#[derive(Debug, Default)]
pub struct ScriptedLock {
    acquire_error: Option<LockError>,
    release_error: Option<LockError>,
    acquire_attempts: AtomicUsize,
    release_attempts: AtomicUsize,
    held: AtomicBool,
}

/// Token handed out by [`ScriptedLock::acquire`].
#[derive(Debug)]
pub struct ScriptedGuard {
    _private: (),
}

impl ScriptedLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_acquire(err: LockError) -> Self {
        Self {
            acquire_error: Some(err),
            ..Self::default()
        }
    }

    pub fn failing_release(err: LockError) -> Self {
        Self {
            release_error: Some(err),
            ..Self::default()
        }
    }

    pub fn acquire_attempts(&self) -> usize {
        self.acquire_attempts.load(Ordering::SeqCst)
    }

    pub fn release_attempts(&self) -> usize {
        self.release_attempts.load(Ordering::SeqCst)
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

impl LockHandle for ScriptedLock {
    type Guard<'a>
        = ScriptedGuard
    where
        Self: 'a;

    fn acquire(&self, _mode: AcquireMode) -> Result<Self::Guard<'_>, LockError> {
        self.acquire_attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.acquire_error {
            return Err(err.clone());
        }
        self.held.store(true, Ordering::SeqCst);
        Ok(ScriptedGuard { _private: () })
    }

    fn release<'a>(&'a self, _guard: Self::Guard<'a>) -> Result<(), LockError> {
        self.release_attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.release_error {
            return Err(err.clone());
        }
        self.held.store(false, Ordering::SeqCst);
        Ok(())
    }
}
