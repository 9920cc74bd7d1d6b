// src/logging.rs

//! Logging for `taskbind`: a `tracing-subscriber` formatter on stderr behind
//! an `EnvFilter`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (one global level)
//! 2. `TASKBIND_LOG`, parsed as filter directives, e.g.
//!    `taskbind::target=debug,info`
//! 3. `info`
//!
//! stdout carries only the rendered target configuration.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "TASKBIND_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = log_filter(cli_level, env.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the filter for a CLI level and the raw `TASKBIND_LOG` value.
///
/// A blank env value counts as unset. Malformed directives are an error
/// rather than being silently dropped.
pub fn log_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(level.as_directive()));
    }
    match env.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("parsing {LOG_ENV}={directives:?}")),
        None => Ok(EnvFilter::new(LogLevel::Info.as_directive())),
    }
}
