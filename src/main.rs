//! Entry point for the chest X-ray analysis client.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use xrayscope::config::{self, AppConfig, ServiceConfig};
use xrayscope::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use xrayscope::logging;

const WINDOW_TITLE: &str = "Chest X-Ray Disease Prediction";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app_config = config::load_or_default();
    let log_settings = app_config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    if let Err(err) = logging::init(&log_settings) {
        eprintln!("Logging disabled: {err}");
    }

    let service = app_config
        .map_err(|err| format!("Failed to load config: {err}"))
        .and_then(|config| resolve_service(&config));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 820.0])
            .with_min_inner_size(MIN_VIEWPORT_SIZE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |_cc| match service {
            Ok(service) => Ok(Box::new(EguiApp::new(service))),
            Err(err) => {
                tracing::error!("{err}");
                Ok(Box::new(LaunchError { message: err }))
            }
        }),
    )?;
    Ok(())
}

fn resolve_service(app_config: &AppConfig) -> Result<ServiceConfig, String> {
    let service = config::resolve_service(app_config)
        .map_err(|err| format!("Invalid service settings: {err}"))?;
    tracing::info!(
        url = %service.api_base_url,
        threshold = ?service.threshold,
        timeout = ?service.request_timeout,
        "Prediction service configured"
    );
    Ok(service)
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start UI");
                ui.label(&self.message);
            });
        });
    }
}
