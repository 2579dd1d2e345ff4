// src/sync/mod.rs

//! Lock handles and the guarded worker that exercises them.

pub mod lock;
pub mod worker;

pub use lock::{AcquireMode, LockError, LockHandle};
pub use worker::{
    start, GuardedWorker, WorkerConfig, WorkerError, WorkerHandle, WorkerOutcome, WorkerPhase,
};
