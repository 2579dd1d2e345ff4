// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::runner::DEFAULT_SHELL;
use crate::sync::{AcquireMode, WorkerConfig};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [runner]
/// shell = "/bin/sh"
///
/// [worker]
/// wait_before_acquire_ms = 0
/// wait_before_release_ms = 50
/// acquire_mode = "blocking"
/// workers = 2
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,

    #[serde(default)]
    pub worker: WorkerSection,
}

/// Validated configuration. Only constructed through `TryFrom<RawConfigFile>`
/// or `Default`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub runner: RunnerSection,
    pub worker: WorkerSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(runner: RunnerSection, worker: WorkerSection) -> Self {
        Self { runner, worker }
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// Command interpreter, invoked as `<shell> -c <command line>`.
    #[serde(default = "default_shell")]
    pub shell: PathBuf,
}

fn default_shell() -> PathBuf {
    PathBuf::from(DEFAULT_SHELL)
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            shell: default_shell(),
        }
    }
}

/// `[worker]` section: defaults for the `worker` subcommand.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSection {
    #[serde(default)]
    pub wait_before_acquire_ms: u64,

    #[serde(default)]
    pub wait_before_release_ms: u64,

    /// `"blocking"` (default) or `"non_blocking"`.
    #[serde(default)]
    pub acquire_mode: AcquireMode,

    /// How many workers share the lock.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    1
}

impl Default for WorkerSection {
    fn default() -> Self {
        Self {
            wait_before_acquire_ms: 0,
            wait_before_release_ms: 0,
            acquire_mode: AcquireMode::default(),
            workers: default_workers(),
        }
    }
}

impl WorkerSection {
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::from_millis(self.wait_before_acquire_ms, self.wait_before_release_ms)
            .with_acquire_mode(self.acquire_mode)
    }
}
