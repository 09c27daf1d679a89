//! egui renderer for the analysis workflow.

mod drop_input;
mod error_panel;
mod loading_overlay;
mod results_panel;
mod status_bar;
pub mod style;
mod textures;
mod upload_panel;

use std::time::Duration;

use crate::config::ServiceConfig;
use crate::egui_app::controller::EguiController;
use crate::egui_app::state::AnalysisPhase;
use eframe::egui::{self, Frame, Margin, RichText};

use textures::TextureCache;

/// Smallest window size that keeps the image pair readable.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(720.0, 560.0);

const APP_TITLE: &str = "Chest X-Ray Disease Prediction";
const APP_SUBTITLE: &str =
    "Upload a chest X-ray image to predict potential diseases with AI-powered visualization";
const PENDING_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    textures: TextureCache,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app and start the background service health check.
    pub fn new(service: ServiceConfig) -> Self {
        let mut controller = EguiController::new(service);
        controller.check_service_health();
        Self {
            controller,
            textures: TextureCache::default(),
            visuals_set: false,
        }
    }

    pub fn controller(&self) -> &EguiController {
        &self.controller
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("header")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.heading(RichText::new(APP_TITLE).strong());
                        ui.label(RichText::new(APP_SUBTITLE).color(palette.text_muted));
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let label = self
                            .controller
                            .ui
                            .service_label
                            .as_deref()
                            .unwrap_or("Checking service...");
                        ui.label(RichText::new(label).color(palette.text_muted))
                            .on_hover_text(&self.controller.service().api_base_url);
                    });
                });
            });
    }

    fn render_center(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::CentralPanel::default()
            .frame(
                Frame::new()
                    .fill(palette.bg_secondary)
                    .inner_margin(Margin::same(16)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| match self.controller.phase() {
                        AnalysisPhase::Idle | AnalysisPhase::Loading => {
                            if upload_panel::render_upload_panel(
                                ui,
                                &self.controller.ui.upload,
                                self.controller.can_submit(),
                                &mut self.textures,
                            ) {
                                self.controller.browse_for_image();
                            }
                        }
                        AnalysisPhase::Error { message } => {
                            if error_panel::render_error_panel(ui, message) {
                                self.controller.reset();
                            }
                        }
                        AnalysisPhase::Results(results) => {
                            let display = self.controller.display_disease();
                            let action = results_panel::render_results(
                                ui,
                                results,
                                &self.controller.ui.results,
                                display,
                                &mut self.textures,
                            );
                            if let Some(action) = action {
                                self.apply_results_action(action);
                            }
                        }
                    });
            });
    }

    fn apply_results_action(&mut self, action: results_panel::ResultsAction) {
        match action {
            results_panel::ResultsAction::Select(disease) => {
                self.controller.select_disease(&disease)
            }
            results_panel::ResultsAction::ToggleAllPredictions => {
                self.controller.toggle_all_predictions()
            }
            results_panel::ResultsAction::Reset => self.controller.reset(),
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        self.handle_file_drops(ctx);
        self.textures.sync(self.controller.generation());
        self.render_header(ctx);
        self.render_status(ctx);
        self.render_center(ctx);
        if self.controller.is_loading() {
            loading_overlay::render_loading_overlay(ctx);
        }
        if self.controller.has_pending_jobs() {
            ctx.request_repaint_after(PENDING_REPAINT_INTERVAL);
        }
    }
}
