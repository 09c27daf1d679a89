use super::jobs::{HealthCheckResult, JobMessage, PredictionJobResult, PreviewResult};
use super::*;

impl EguiController {
    /// Drain finished background work and fold it into the UI state.
    pub fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(
                    std::sync::mpsc::TryRecvError::Empty
                    | std::sync::mpsc::TryRecvError::Disconnected,
                ) => {
                    break;
                }
            };

            match message {
                JobMessage::PredictionFinished(message) => self.handle_prediction_finished(message),
                JobMessage::PreviewDecoded(message) => self.handle_preview_decoded(message),
                JobMessage::HealthChecked(message) => self.handle_health_checked(message),
            }
        }
    }

    fn handle_prediction_finished(&mut self, message: PredictionJobResult) {
        if message.generation != self.generation || !self.is_loading() {
            tracing::debug!(
                generation = message.generation,
                current = self.generation,
                "Discarding stale prediction result"
            );
            return;
        }
        match message.result {
            Ok(outcome) => {
                let count = outcome.response.predictions.len();
                let status = if count == 0 {
                    format!("No conditions above threshold in {}", message.source_name)
                } else if count == 1 {
                    format!("1 condition detected in {}", message.source_name)
                } else {
                    format!("{count} conditions detected in {}", message.source_name)
                };
                let missing = outcome.response.missing_heatmaps();
                if !missing.is_empty() {
                    tracing::warn!(?missing, "Predictions without Grad-CAM heatmaps");
                }
                self.ui.phase = AnalysisPhase::Results(Box::new(AnalysisResults {
                    source_name: message.source_name,
                    response: outcome.response,
                    images: outcome.images,
                }));
                self.ui.results = ResultsViewState::default();
                self.set_status(status, StatusTone::Info);
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!("Analysis failed: {message}");
                self.ui.phase = AnalysisPhase::Error {
                    message: message.clone(),
                };
                self.set_status(message, StatusTone::Error);
            }
        }
    }

    fn handle_preview_decoded(&mut self, message: PreviewResult) {
        if message.generation != self.generation {
            return;
        }
        self.jobs.clear_preview();
        match message.result {
            Ok(image) => {
                self.ui.upload.preview = Some(PreviewImage {
                    generation: message.generation,
                    name: message.name,
                    image,
                });
            }
            Err(err) => tracing::warn!(file = %message.name, "Preview could not be decoded: {err}"),
        }
    }

    fn handle_health_checked(&mut self, message: HealthCheckResult) {
        self.jobs.clear_health_check();
        let label = match message.result {
            Ok(health) if health.is_ready() => {
                let device = health.device.as_deref().unwrap_or("unknown device");
                tracing::info!(url = %message.api_base_url, device, "Prediction service ready");
                format!("Service ready ({device})")
            }
            Ok(health) => {
                tracing::warn!(
                    url = %message.api_base_url,
                    status = %health.status,
                    "Prediction service reports model not loaded"
                );
                "Service up, model not loaded".to_string()
            }
            Err(err) => {
                tracing::warn!(url = %message.api_base_url, "Health check failed: {err}");
                "Service unreachable".to_string()
            }
        };
        self.ui.service_label = Some(label);
    }
}
