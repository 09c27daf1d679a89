//! Shared state types for the egui UI.

use std::collections::HashMap;

use crate::egui_app::ui::style;
use crate::prediction::PredictionResponse;
use egui::{Color32, ColorImage};

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    pub phase: AnalysisPhase,
    pub upload: UploadState,
    pub results: ResultsViewState,
    /// Short description of the prediction service's health, when known.
    pub service_label: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            phase: AnalysisPhase::Idle,
            upload: UploadState::default(),
            results: ResultsViewState::default(),
            service_label: None,
        }
    }
}

/// The single active view. Only the controller moves between phases.
#[derive(Clone, Debug, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Loading,
    Error {
        message: String,
    },
    Results(Box<AnalysisResults>),
}

impl AnalysisPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&AnalysisResults> {
        match self {
            Self::Results(results) => Some(results),
            _ => None,
        }
    }
}

/// A completed analysis with its images decoded for display.
#[derive(Clone, Debug)]
pub struct AnalysisResults {
    pub source_name: String,
    pub response: PredictionResponse,
    pub images: ResultImages,
}

/// Decoded `original_image` and heatmaps; entries that failed to decode are absent.
#[derive(Clone, Debug, Default)]
pub struct ResultImages {
    pub original: Option<ColorImage>,
    pub heatmaps: HashMap<String, ColorImage>,
}

/// Upload surface state.
#[derive(Clone, Debug, Default)]
pub struct UploadState {
    pub preview: Option<PreviewImage>,
    /// Files are currently hovering over the window.
    pub drag_active: bool,
    /// Last rejection shown on the upload surface.
    pub rejection: Option<String>,
}

/// Local preview of the submitted file.
#[derive(Clone, Debug)]
pub struct PreviewImage {
    /// Submission this preview belongs to.
    pub generation: u64,
    pub name: String,
    pub image: ColorImage,
}

/// Local toggles of the results view; cleared on reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultsViewState {
    /// Disease explicitly clicked by the user.
    pub selected_disease: Option<String>,
    pub show_all_predictions: bool,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Drop a chest X-ray image to get started".into(),
            badge_label: "Idle".into(),
            badge_color: style::status_badge_color(style::StatusTone::Idle),
        }
    }
}
