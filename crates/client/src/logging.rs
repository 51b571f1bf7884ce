//! File logging for terminal sessions.
//!
//! Logs go to a per-session directory so the terminal stays free for game
//! prompts. Set `RUST_LOG` to change the filter (default `info`).
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Handle returned by [`setup_logging`]; dropping it flushes and stops the
/// file writer.
pub struct LogSession {
    pub session_id: String,
    pub log_file: PathBuf,
    _guard: WorkerGuard,
}

/// Install the global subscriber writing to `<cache>/arena/logs/<session>/arena.log`.
pub fn setup_logging(session_id: Option<&str>) -> Result<LogSession> {
    let session_id = session_id
        .map(str::to_owned)
        .unwrap_or_else(|| format!("session_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")));

    let session_log_dir = log_dir().join(&session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "failed to create log directory {}",
            session_log_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "arena.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    let log_file = session_log_dir.join("arena.log");
    tracing::info!(session = %session_id, file = %log_file.display(), "logging initialized");

    Ok(LogSession {
        session_id,
        log_file,
        _guard: guard,
    })
}

/// Platform cache directory for arena logs.
///
/// - macOS: `~/Library/Caches/arena/logs`
/// - Linux: `~/.cache/arena/logs` (or `$XDG_CACHE_HOME/arena/logs`)
/// - Windows: `%LOCALAPPDATA%\arena\cache\logs`
/// - Fallback: `<tmp>/arena/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "arena")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("arena"))
        .join("logs")
}
