mod app;
mod io;
mod model;

use anyhow::Context;
use app::{configure_fonts, DesktopApp};
use plate_detect::config::Config;
use plate_detect::error::PlateDetectError;
use plate_detect::{logging, DetectClient};
use plate_detect_common::DEFAULT_BACKEND_URL;

fn main() -> anyhow::Result<()> {
    logging::init(std::env::args().any(|arg| arg == "--verbose" || arg == "-v"));

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "config unreadable, using defaults");
        Config::default()
    });
    let backend_url = match config.resolve_backend_url(None) {
        Ok(url) => url,
        Err(PlateDetectError::MissingBackendUrl) => {
            tracing::warn!(default = DEFAULT_BACKEND_URL, "backend URL not configured, using default");
            DEFAULT_BACKEND_URL.to_string()
        }
        Err(err) => return Err(err.into()),
    };
    let client = DetectClient::new(&backend_url, config.timeout())
        .with_context(|| format!("backend {backend_url}"))?;

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "License Plate Detector",
        options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx);
            Box::new(DesktopApp::new(client))
        }),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
