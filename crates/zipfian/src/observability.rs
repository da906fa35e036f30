//! Logging setup for the CLI.
//!
//! Human-readable events go to stderr. When a log file or directory is
//! configured, events are also written as JSON lines through a
//! non-blocking appender.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_PATH_ENV: &str = "ZIPFIAN_LOG_PATH";
const LOG_DIR_ENV: &str = "ZIPFIAN_LOG_DIR";
const LOG_FILE_NAME: &str = "zipfian.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Explicit log file path.
    pub log_path: Option<PathBuf>,
    /// Directory for a daily-rotated `zipfian.jsonl`.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read `ZIPFIAN_LOG_PATH` / `ZIPFIAN_LOG_DIR`, falling back to the
    /// configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let log_path = std::env::var_os(LOG_PATH_ENV).map(PathBuf::from);
        let log_dir = std::env::var_os(LOG_DIR_ENV)
            .map(PathBuf::from)
            .or(config_log_dir);
        Self { log_path, log_dir }
    }
}

/// Build the filter: `RUST_LOG` wins, then `-q`/`-v`, then the config level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => config_level,
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    EnvFilter::new(level)
}

/// Install the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match file_appender(config)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

fn file_appender(
    config: &ObservabilityConfig,
) -> anyhow::Result<Option<tracing_appender::rolling::RollingFileAppender>> {
    if let Some(ref path) = config.log_path {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .with_context(|| format!("log path has no file name: {}", path.display()))?;
        ensure_dir(dir)?;
        return Ok(Some(tracing_appender::rolling::never(dir, name)));
    }
    if let Some(ref dir) = config.log_dir {
        ensure_dir(dir)?;
        return Ok(Some(tracing_appender::rolling::daily(dir, LOG_FILE_NAME)));
    }
    Ok(None)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))
}
