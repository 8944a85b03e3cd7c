mod app;
mod config;
mod upload;
mod utils;

use app::UploadController;
use clap::Parser;
use config::AppConfig;
use eframe::CreationContext;
use tracing_subscriber::EnvFilter;
use upload::ExtractionClient;

fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

fn main() -> Result<(), eframe::Error> {
    let config = AppConfig::parse();
    init_tracing(&config.log_filter);

    let mut controller = UploadController::new(ExtractionClient::new(config.base_url()));
    if config.check_health {
        controller.check_health();
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 640.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Invoice Extraction",
        options,
        Box::new(move |_cc: &CreationContext| Box::new(controller)),
    )
}
