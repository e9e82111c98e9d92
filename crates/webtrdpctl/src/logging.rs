//! Logging setup for webtrdpctl
//!
//! One-shot commands log to stderr. The monitor owns the terminal, so it logs
//! to a file found through a fallback chain.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter
pub const ENV_LOG_FILTER: &str = "WEBTRDP_LOG";

/// Environment variable overriding the monitor log file
pub const ENV_LOG_FILE: &str = "WEBTRDP_LOG_FILE";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr, `warn` unless WEBTRDP_LOG says otherwise
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to the monitor log file.
///
/// Returns the path in use, or None when no file could be opened (logging
/// stays off rather than drawing over the TUI).
pub fn init_file() -> Option<PathBuf> {
    let path = discover_log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}

/// Discover the monitor log path.
///
/// Priority:
/// 1. $WEBTRDP_LOG_FILE
/// 2. $XDG_STATE_HOME/webtrdp/monitor.log
/// 3. ~/.local/state/webtrdp/monitor.log
pub fn discover_log_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_LOG_FILE) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    if let Ok(state) = std::env::var("XDG_STATE_HOME") {
        if !state.is_empty() {
            return Some(PathBuf::from(state).join("webtrdp").join("monitor.log"));
        }
    }

    dirs::home_dir().map(|home| {
        home.join(".local")
            .join("state")
            .join("webtrdp")
            .join("monitor.log")
    })
}
