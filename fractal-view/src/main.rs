//! Application entry point for the fractal tree viewer.
//!
//! This binary sets up logging and eframe/egui, then delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging goes to stderr, filtered by `RUST_LOG` (default `info`).
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or the initial
///   tree cannot be built.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = eframe::NativeOptions::default();
    let viewer = Viewer::new().map_err(|err| eframe::Error::AppCreation(Box::new(err)))?;

    eframe::run_native(
        "Fractal Tree",
        options,
        Box::new(|_cc| {
            // Hand the prepared viewer state to eframe.
            Ok(Box::new(viewer))
        }),
    )
}
