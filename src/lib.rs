// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;
pub mod sync;
pub mod syslog;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{load_or_default, ConfigFile};
use crate::exec::{ArgumentVector, CommandRunner, ProcessLauncher};
use crate::report::SharedReporter;
use crate::sync::{AcquireMode, GuardedWorker, WorkerHandle};

/// High-level entry point used by `main.rs`.
///
/// Loads the config, dispatches the subcommand and returns whether the
/// operation succeeded. Blocking process and join calls are moved off the
/// async executor with `spawn_blocking`.
pub async fn run(args: CliArgs) -> Result<bool> {
    let cfg = load_or_default(args.config.as_deref()).context("loading configuration")?;
    debug!(?cfg, "configuration loaded");

    let reporter = report::tracing_reporter();

    match args.command {
        Command::Run { command_line } => {
            let runner = CommandRunner::new()
                .with_shell(cfg.runner.shell.clone())
                .with_reporter(reporter);
            let outcome = tokio::task::spawn_blocking(move || runner.run(&command_line)).await?;
            Ok(outcome.success())
        }

        Command::Exec { program, args } => {
            let argv = ArgumentVector::new(program, args)?;
            let launcher = ProcessLauncher::new().with_reporter(reporter);
            let outcome = tokio::task::spawn_blocking(move || launcher.exec(&argv)).await?;
            Ok(outcome.success())
        }

        Command::ExecRedirect {
            output,
            program,
            args,
        } => {
            let argv = ArgumentVector::new(program, args)?;
            let launcher = ProcessLauncher::new().with_reporter(reporter);
            let outcome =
                tokio::task::spawn_blocking(move || launcher.exec_redirected(&output, &argv))
                    .await?;
            Ok(outcome.success())
        }

        Command::Worker {
            wait_before_acquire_ms,
            wait_before_release_ms,
            workers,
            non_blocking,
        } => {
            let mut section = cfg.worker.clone();
            if let Some(ms) = wait_before_acquire_ms {
                section.wait_before_acquire_ms = ms;
            }
            if let Some(ms) = wait_before_release_ms {
                section.wait_before_release_ms = ms;
            }
            if let Some(n) = workers {
                section.workers = n;
            }
            if non_blocking {
                section.acquire_mode = AcquireMode::NonBlocking;
            }

            let merged = ConfigFile {
                worker: section,
                ..cfg
            };
            run_workers(&merged, reporter).await
        }
    }
}

/// Start `[worker].workers` guarded workers on one shared lock, join them
/// all, and succeed only if every worker did.
async fn run_workers(cfg: &ConfigFile, reporter: SharedReporter) -> Result<bool> {
    let count = cfg.worker.workers;
    if count == 0 {
        bail!("--workers must be >= 1 (got 0)");
    }

    let worker_config = cfg.worker.worker_config();
    info!(workers = count, ?worker_config, "starting guarded workers");

    let lock = Arc::new(tokio::sync::Mutex::new(()));
    let handles = (0..count)
        .map(|_| {
            GuardedWorker::new(worker_config)
                .with_reporter(Arc::clone(&reporter))
                .start(Arc::clone(&lock))
        })
        .collect::<std::result::Result<Vec<WorkerHandle>, _>>()?;

    let mut all_succeeded = true;
    for handle in handles {
        let id = handle.id();
        let outcome = tokio::task::spawn_blocking(move || handle.join()).await??;
        info!(worker = id, %outcome, "worker joined");
        all_succeeded &= outcome.success();
    }

    Ok(all_succeeded)
}
