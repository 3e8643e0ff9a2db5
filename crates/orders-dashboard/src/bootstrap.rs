use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashboard_core::settings::ORDERS_FILE;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.orders-dashboard/`, or `./.orders-dashboard/` without a home directory.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".orders-dashboard")
}

/// Ensure `~/.orders-dashboard/` and its `logs/` subdirectory exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;
    std::fs::create_dir_all(dir.join("logs"))?;
    Ok(())
}

/// `~/.orders-dashboard/logs/orders-dashboard.log`
pub fn default_log_path() -> PathBuf {
    app_dir().join("logs").join("orders-dashboard.log")
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unrecognised names pass through unchanged so `RUST_LOG`-style directives
/// such as `dashboard_data=trace` also work.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber, appending to `log_file`.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or
/// stderr. Falls back to `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str, log_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Data-directory discovery ───────────────────────────────────────────────────

/// Locate a directory holding the orders CSV when `--data-dir` is not given.
///
/// Checks the working directory, its `data/` subdirectory and
/// `~/.orders-dashboard/data/`, in that order.
pub fn discover_data_dir() -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_data_dir(&[cwd.clone(), cwd.join("data"), app_dir().join("data")])
}

/// First of `candidates` that contains the orders CSV.
fn find_data_dir(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|dir| dir.join(ORDERS_FILE).is_file())
        .cloned()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
