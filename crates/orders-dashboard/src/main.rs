mod bootstrap;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use dashboard_core::error::DashboardError;
use dashboard_core::settings::Settings;
use dashboard_data::dataset::load_dataset;
use dashboard_data::reader::SourcePaths;
use dashboard_runtime::controller::DashboardController;
use dashboard_ui::app::{App, ViewMode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let mut settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .clone()
        .unwrap_or_else(bootstrap::default_log_path);
    bootstrap::setup_logging(&settings.log_level, &log_file)?;

    tracing::info!("Orders Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, End boundary: {}, Invalid timestamps: {}",
        settings.view,
        settings.theme,
        settings.end_boundary.as_str(),
        settings.invalid_timestamps.as_str()
    );

    // With all three tables given explicitly the data directory is unused.
    if !settings.has_explicit_files() {
        match settings.data_dir.clone() {
            Some(dir) if !dir.is_dir() => {
                return Err(DashboardError::DataPathNotFound(dir).into());
            }
            Some(_) => {}
            None => settings.data_dir = bootstrap::discover_data_dir(),
        }
    }
    let policy = settings.invalid_timestamps;
    let boundary = settings.end_boundary;

    let paths = SourcePaths {
        orders: settings.orders_path(),
        reviews: settings.reviews_path(),
        payments: settings.payments_path(),
    };
    tracing::info!(
        orders = %paths.orders.display(),
        reviews = %paths.reviews.display(),
        payments = %paths.payments.display(),
        "loading tables"
    );

    let dataset = load_dataset(&paths, policy).context("failed to load the order tables")?;
    let meta = dataset.metadata();
    if meta.dropped_malformed + meta.dropped_missing > 0 {
        tracing::warn!(
            malformed = meta.dropped_malformed,
            missing = meta.dropped_missing,
            "rows without a usable purchase timestamp were left out"
        );
    }

    let controller = DashboardController::new(Arc::new(dataset), boundary);
    let selector = controller.selector(settings.start, settings.end);
    let view_mode = ViewMode::from_name(&settings.view);
    let app = App::new(&settings.theme, view_mode, controller, selector);

    match view_mode {
        ViewMode::Dashboard => tracing::info!("Starting interactive dashboard..."),
        ViewMode::Table => tracing::info!("Running table view..."),
    }

    // The TUI blocks on terminal input, so it runs off the async runtime.
    // Ctrl+C inside the TUI arrives as a key press; a SIGINT from outside
    // raises the shutdown flag, which the loop checks on every tick.
    let shutdown = Arc::new(AtomicBool::new(false));
    let mut ui = tokio::task::spawn_blocking({
        let shutdown = Arc::clone(&shutdown);
        move || app.run(&shutdown)
    });

    tokio::select! {
        joined = &mut ui => joined??,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    tracing::info!("Ctrl+C received; shutting down");
                    shutdown.store(true, Ordering::Relaxed);
                }
                Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl+C"),
            }
            ui.await??;
        }
    }

    tracing::info!("Orders Dashboard exiting");
    Ok(())
}
