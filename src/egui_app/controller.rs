//! Analysis state machine that bridges the prediction client to the egui UI.
//!
//! Phases move Idle → Loading → Error | Results, and back to Idle only via
//! [`EguiController::reset`]. Every submission gets a new generation number;
//! results that arrive for an older generation are dropped.

mod background_jobs;
pub(crate) mod jobs;
#[cfg(test)]
mod tests;

use std::path::Path;

use crate::config::ServiceConfig;
use crate::egui_app::state::*;
use crate::egui_app::ui::style::{self, StatusTone};
use crate::egui_app::view_model;
use crate::image_file::ImageFile;
use rfd::FileDialog;

use jobs::{ControllerJobs, PredictionJob, PreviewJob};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Maintains app state and bridges the prediction service to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    service: ServiceConfig,
    jobs: ControllerJobs,
    generation: u64,
}

impl EguiController {
    pub fn new(service: ServiceConfig) -> Self {
        Self {
            ui: UiState::default(),
            service,
            jobs: ControllerJobs::new(),
            generation: 0,
        }
    }

    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.ui.phase
    }

    pub fn is_loading(&self) -> bool {
        self.ui.phase.is_loading()
    }

    /// Uploads are accepted only from Idle; Error and Results need a reset first.
    pub fn can_submit(&self) -> bool {
        matches!(self.ui.phase, AnalysisPhase::Idle)
    }

    /// Identifies the current submission; bumps on every submit and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while any background work may still report back.
    pub fn has_pending_jobs(&self) -> bool {
        self.is_loading() || self.jobs.preview_in_progress() || self.jobs.health_check_in_progress()
    }

    /// Update the status bar text and badge.
    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = style::status_badge(tone);
        self.ui.status = StatusBarState {
            text: text.into(),
            badge_label: label.into(),
            badge_color: color,
        };
    }

    /// Ask the service whether its model is loaded; the answer only feeds the status bar.
    pub fn check_service_health(&mut self) {
        self.jobs.begin_health_check(self.service.clone());
    }

    /// Open a native picker and submit the chosen image.
    pub fn browse_for_image(&mut self) {
        if !self.can_submit() {
            return;
        }
        let Some(path) = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.submit_path(&path);
    }

    /// Validate a file on disk and submit it. Returns whether a request was sent.
    pub fn submit_path(&mut self, path: &Path) -> bool {
        if !self.can_submit() {
            return false;
        }
        match ImageFile::from_path(path) {
            Ok(file) => self.submit_file(file),
            Err(err) => {
                self.reject_file(err.to_string());
                false
            }
        }
    }

    /// Validate in-memory bytes (e.g. a dropped file without a path) and submit them.
    pub fn submit_bytes(&mut self, name: &str, media_type: Option<&str>, bytes: &[u8]) -> bool {
        if !self.can_submit() {
            return false;
        }
        match ImageFile::from_bytes(name, media_type, bytes) {
            Ok(file) => self.submit_file(file),
            Err(err) => {
                self.reject_file(err.to_string());
                false
            }
        }
    }

    /// Enter Loading and start the upload plus an independent preview decode.
    ///
    /// Ignored unless Idle, so a second upload cannot start while one is in flight.
    pub fn submit_file(&mut self, file: ImageFile) -> bool {
        if !self.can_submit() {
            tracing::debug!(file = %file.name, "Ignoring submission outside Idle");
            return false;
        }
        self.generation += 1;
        let generation = self.generation;
        self.ui.phase = AnalysisPhase::Loading;
        self.ui.results = ResultsViewState::default();
        self.ui.upload.preview = None;
        self.ui.upload.rejection = None;
        self.set_status(format!("Analyzing {}...", file.name), StatusTone::Busy);
        tracing::info!(file = %file.name, generation, "Starting analysis");

        self.jobs.begin_preview(PreviewJob {
            generation,
            file: file.clone(),
        });
        self.jobs.begin_prediction(PredictionJob {
            generation,
            file,
            service: self.service.clone(),
        });
        true
    }

    fn reject_file(&mut self, message: String) {
        tracing::info!("Rejected file: {message}");
        self.ui.upload.rejection = Some(message.clone());
        self.set_status(message, StatusTone::Warning);
    }

    /// Disease whose heatmap is displayed in the results view.
    pub fn display_disease(&self) -> Option<&str> {
        let results = self.ui.phase.results()?;
        view_model::display_disease(
            &results.response,
            self.ui.results.selected_disease.as_deref(),
        )
    }

    /// Pin a disease as the displayed one until reset.
    pub fn select_disease(&mut self, disease: &str) {
        let Some(results) = self.ui.phase.results() else {
            return;
        };
        if !results.response.predictions.contains_key(disease) {
            return;
        }
        self.ui.results.selected_disease = Some(disease.to_string());
    }

    pub fn toggle_all_predictions(&mut self) {
        if self.ui.phase.results().is_some() {
            self.ui.results.show_all_predictions = !self.ui.results.show_all_predictions;
        }
    }

    /// Return to Idle, dropping results, errors, and the preview.
    ///
    /// An upload still in flight is not aborted; its response is discarded
    /// when it arrives.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.ui.phase = AnalysisPhase::Idle;
        self.ui.results = ResultsViewState::default();
        self.ui.upload.preview = None;
        self.ui.upload.rejection = None;
        self.ui.status = StatusBarState::idle();
        self.jobs.clear_preview();
        tracing::debug!(generation = self.generation, "Analysis reset");
    }
}
