// src/sync/worker.rs

//! Guarded worker: wait, take a shared lock, wait while holding it, release.
//!
//! The worker runs on its own OS thread and owns its [`WorkerConfig`]. The
//! caller keeps its own `Arc` to the lock and reads the result only through
//! [`WorkerHandle::join`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::report::{self, Diagnostic, Reporter, SharedReporter};
use crate::sync::lock::{AcquireMode, LockError, LockHandle};

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of a guarded worker, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Created,
    WaitingToAcquire,
    Acquiring,
    HoldingLock,
    WaitingToRelease,
    Releasing,
    Finished,
}

/// What a finished worker recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Lock acquired and released.
    Completed,
    /// Acquisition failed; release was not attempted.
    AcquireFailed(LockError),
    /// Lock acquired but release failed.
    ReleaseFailed(LockError),
}

impl WorkerOutcome {
    /// `true` iff both acquisition and release succeeded.
    pub fn success(&self) -> bool {
        matches!(self, WorkerOutcome::Completed)
    }
}

impl fmt::Display for WorkerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerOutcome::Completed => f.write_str("completed"),
            WorkerOutcome::AcquireFailed(err) => write!(f, "acquire failed: {err}"),
            WorkerOutcome::ReleaseFailed(err) => write!(f, "release failed: {err}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("worker {0} panicked")]
    Panicked(u64),
}

/// Delays and acquisition mode, moved into the worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerConfig {
    pub wait_before_acquire: Duration,
    pub wait_before_release: Duration,
    pub acquire_mode: AcquireMode,
}

impl WorkerConfig {
    pub fn from_millis(wait_before_acquire_ms: u64, wait_before_release_ms: u64) -> Self {
        Self {
            wait_before_acquire: Duration::from_millis(wait_before_acquire_ms),
            wait_before_release: Duration::from_millis(wait_before_release_ms),
            acquire_mode: AcquireMode::Blocking,
        }
    }

    pub fn with_acquire_mode(mut self, mode: AcquireMode) -> Self {
        self.acquire_mode = mode;
        self
    }
}

/// Builder for a guarded worker run.
#[derive(Debug, Clone)]
pub struct GuardedWorker {
    config: WorkerConfig,
    reporter: SharedReporter,
}

impl GuardedWorker {
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            reporter: report::noop(),
        }
    }

    pub fn with_reporter(mut self, reporter: SharedReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Start the worker on a new thread.
    ///
    /// Fails only if the thread cannot be created; lock failures are
    /// recorded in the [`WorkerOutcome`] returned by `join`.
    pub fn start<L>(self, lock: Arc<L>) -> Result<WorkerHandle, WorkerError>
    where
        L: LockHandle + 'static,
    {
        let id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);
        let GuardedWorker { config, reporter } = self;

        reporter.report(Diagnostic::WorkerPhase {
            worker: id,
            phase: WorkerPhase::Created,
        });

        let thread = thread::Builder::new()
            .name(format!("guarded-worker-{id}"))
            .spawn(move || run_worker(id, lock.as_ref(), &config, reporter.as_ref()))
            .map_err(WorkerError::Spawn)?;

        Ok(WorkerHandle { id, thread })
    }
}

/// Start a worker with the given delays in milliseconds, blocking
/// acquisition and no diagnostics.
pub fn start<L>(
    lock: Arc<L>,
    wait_before_acquire_ms: u64,
    wait_before_release_ms: u64,
) -> Result<WorkerHandle, WorkerError>
where
    L: LockHandle + 'static,
{
    GuardedWorker::new(WorkerConfig::from_millis(
        wait_before_acquire_ms,
        wait_before_release_ms,
    ))
    .start(lock)
}

/// Handle to a running worker. Joining is the only way to read its outcome.
#[derive(Debug)]
pub struct WorkerHandle {
    id: u64,
    thread: JoinHandle<WorkerOutcome>,
}

impl WorkerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the worker thread has exited. Does not block.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the worker finishes and return what it recorded.
    pub fn join(self) -> Result<WorkerOutcome, WorkerError> {
        self.thread.join().map_err(|_| WorkerError::Panicked(self.id))
    }
}

fn run_worker<L: LockHandle>(
    id: u64,
    lock: &L,
    config: &WorkerConfig,
    reporter: &dyn Reporter,
) -> WorkerOutcome {
    let enter = |phase| reporter.report(Diagnostic::WorkerPhase { worker: id, phase });

    enter(WorkerPhase::WaitingToAcquire);
    thread::sleep(config.wait_before_acquire);

    enter(WorkerPhase::Acquiring);
    let outcome = match lock.acquire(config.acquire_mode) {
        Err(err) => WorkerOutcome::AcquireFailed(err),
        Ok(guard) => {
            enter(WorkerPhase::HoldingLock);
            enter(WorkerPhase::WaitingToRelease);
            thread::sleep(config.wait_before_release);

            enter(WorkerPhase::Releasing);
            match lock.release(guard) {
                Ok(()) => WorkerOutcome::Completed,
                Err(err) => WorkerOutcome::ReleaseFailed(err),
            }
        }
    };

    enter(WorkerPhase::Finished);
    reporter.report(Diagnostic::WorkerFinished {
        worker: id,
        outcome: outcome.clone(),
    });

    outcome
}
