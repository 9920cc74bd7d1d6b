// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskbind`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskbind",
    version,
    about = "Resolve scheduled task targets into run-task parameters and IAM policy.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Taskbind.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Taskbind.toml")]
    pub config: String,

    /// Bind only the target with this name.
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Overrides `TASKBIND_LOG`; if both are absent, `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print a summary, but don't bind any target.
    #[arg(long)]
    pub dry_run: bool,
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

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
