use crate::config::ServiceConfig;
use crate::egui_app::state::ResultImages;
use crate::image_file::{self, ImageFile};
use crate::prediction::{self, PredictionError, PredictionResponse, ServiceHealth};
use egui::ColorImage;
use std::{
    collections::HashMap,
    sync::mpsc::{Receiver, Sender},
    thread,
};

type TryRecvError = std::sync::mpsc::TryRecvError;

pub(crate) enum JobMessage {
    PredictionFinished(PredictionJobResult),
    PreviewDecoded(PreviewResult),
    HealthChecked(HealthCheckResult),
}

#[derive(Debug)]
pub(crate) struct PredictionJob {
    pub(crate) generation: u64,
    pub(crate) file: ImageFile,
    pub(crate) service: ServiceConfig,
}

#[derive(Debug)]
pub(crate) struct PredictionOutcome {
    pub(crate) response: PredictionResponse,
    pub(crate) images: ResultImages,
}

#[derive(Debug)]
pub(crate) struct PredictionJobResult {
    pub(crate) generation: u64,
    pub(crate) source_name: String,
    pub(crate) result: Result<PredictionOutcome, PredictionError>,
}

#[derive(Debug)]
pub(crate) struct PreviewJob {
    pub(crate) generation: u64,
    pub(crate) file: ImageFile,
}

#[derive(Debug)]
pub(crate) struct PreviewResult {
    pub(crate) generation: u64,
    pub(crate) name: String,
    pub(crate) result: Result<ColorImage, String>,
}

#[derive(Debug)]
pub(crate) struct HealthCheckResult {
    pub(crate) api_base_url: String,
    pub(crate) result: Result<ServiceHealth, PredictionError>,
}

/// Worker threads report back through one channel drained on the UI thread.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    preview_in_progress: bool,
    health_check_in_progress: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            preview_in_progress: false,
            health_check_in_progress: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    #[cfg(test)]
    pub(super) fn message_sender(&self) -> Sender<JobMessage> {
        self.message_tx.clone()
    }

    pub(super) fn begin_prediction(&mut self, job: PredictionJob) {
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = prediction::submit(&job.service, &job.file).map(|response| {
                let images = decode_result_images(&response);
                PredictionOutcome { response, images }
            });
            let _ = tx.send(JobMessage::PredictionFinished(PredictionJobResult {
                generation: job.generation,
                source_name: job.file.name,
                result,
            }));
        });
    }

    pub(super) fn preview_in_progress(&self) -> bool {
        self.preview_in_progress
    }

    pub(super) fn begin_preview(&mut self, job: PreviewJob) {
        self.preview_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = image_file::decode_preview(&job.file.bytes).map_err(|err| err.to_string());
            let _ = tx.send(JobMessage::PreviewDecoded(PreviewResult {
                generation: job.generation,
                name: job.file.name,
                result,
            }));
        });
    }

    pub(super) fn clear_preview(&mut self) {
        self.preview_in_progress = false;
    }

    pub(super) fn health_check_in_progress(&self) -> bool {
        self.health_check_in_progress
    }

    pub(super) fn begin_health_check(&mut self, service: ServiceConfig) {
        if self.health_check_in_progress {
            return;
        }
        self.health_check_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = prediction::check_health(&service);
            let _ = tx.send(JobMessage::HealthChecked(HealthCheckResult {
                api_base_url: service.api_base_url,
                result,
            }));
        });
    }

    pub(super) fn clear_health_check(&mut self) {
        self.health_check_in_progress = false;
    }
}

/// Decode the original image and every heatmap; failures are logged and skipped.
pub(crate) fn decode_result_images(response: &PredictionResponse) -> ResultImages {
    let original = if response.original_image.trim().is_empty() {
        None
    } else {
        match image_file::decode_base64_image(&response.original_image) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::warn!("Original image could not be decoded: {err}");
                None
            }
        }
    };
    let mut heatmaps = HashMap::new();
    for disease in response.predictions.keys() {
        let Some(encoded) = response.heatmap_for(disease) else {
            tracing::warn!(disease, "No Grad-CAM heatmap returned");
            continue;
        };
        match image_file::decode_base64_image(encoded) {
            Ok(image) => {
                heatmaps.insert(disease.to_string(), image);
            }
            Err(err) => tracing::warn!(disease, "Grad-CAM heatmap could not be decoded: {err}"),
        }
    }
    ResultImages { original, heatmaps }
}
