// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `sysexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sysexec",
    version,
    about = "Run command lines, launch processes and exercise guarded lock workers.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Sysexec.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SYSEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a command line through the command interpreter.
    Run {
        #[arg(value_name = "COMMAND_LINE")]
        command_line: String,
    },

    /// Fork and exec PROGRAM (no PATH search) with ARGS.
    Exec {
        #[arg(value_name = "PROGRAM")]
        program: String,

        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Like `exec`, with the child's stdout written to PATH.
    ExecRedirect {
        /// Output file; created if absent, truncated if present.
        #[arg(long, short, value_name = "PATH")]
        output: PathBuf,

        #[arg(value_name = "PROGRAM")]
        program: String,

        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Start guarded workers on one shared lock and join them.
    ///
    /// Flags override the `[worker]` section of the config file.
    Worker {
        #[arg(long, value_name = "MS")]
        wait_before_acquire_ms: Option<u64>,

        #[arg(long, value_name = "MS")]
        wait_before_release_ms: Option<u64>,

        /// Number of workers sharing the lock.
        #[arg(long, value_name = "N")]
        workers: Option<usize>,

        /// Fail instead of waiting when the lock is already held.
        #[arg(long)]
        non_blocking: bool,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
