//! Blocking client for the prediction service's HTTP endpoints.

use std::time::Duration;

use serde::Deserialize;

use crate::config::ServiceConfig;
use crate::http_client;
use crate::image_file::ImageFile;

use super::multipart::MultipartForm;
use super::response::{PredictionResponse, ServiceHealth};

/// Shown when the service fails without a usable `detail`.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to process image";

const PREDICT_PATH: &str = "/predict";
const PREDICT_WITH_THRESHOLD_PATH: &str = "/predict-with-threshold";
const HEALTH_PATH: &str = "/health";
const UPLOAD_FIELD: &str = "file";
const MAX_ERROR_RESPONSE_BYTES: usize = 256 * 1024;
const MAX_HEALTH_RESPONSE_BYTES: usize = 64 * 1024;
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// Non-2xx status; `message` is the server's `detail` or the fallback text.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Failed to read response: {0}")]
    Body(String),
    #[error("Invalid response from prediction service: {0}")]
    MalformedBody(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Upload an image and return the parsed predictions.
pub fn submit(
    config: &ServiceConfig,
    file: &ImageFile,
) -> Result<PredictionResponse, PredictionError> {
    let mut form = MultipartForm::new();
    form.add_file(UPLOAD_FIELD, &file.name, &file.media_type, &file.bytes);
    let content_type = form.content_type();
    let body = form.finish();

    let mut request =
        http_client::json_request("POST", &predict_url(config), config.request_timeout)
            .set("Content-Type", &content_type);
    if let Some(threshold) = config.threshold {
        request = request.query("threshold", &threshold.to_string());
    }
    tracing::info!(
        file = %file.name,
        bytes = file.bytes.len(),
        threshold = ?config.threshold,
        "Submitting image for prediction"
    );

    let response = match request.send_bytes(&body) {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let message = error_message(response);
            tracing::warn!(status = code, %message, "Prediction request rejected");
            return Err(PredictionError::Server {
                status: code,
                message,
            });
        }
        Err(ureq::Error::Transport(err)) => {
            tracing::warn!("Prediction request failed: {err}");
            return Err(PredictionError::Transport(err.to_string()));
        }
    };

    let bytes = http_client::read_body(response, config.max_response_bytes)
        .map_err(|err| PredictionError::Body(err.to_string()))?;
    let parsed = parse_prediction_body(&bytes)?;
    tracing::info!(
        predictions = parsed.predictions.len(),
        "Prediction response received"
    );
    Ok(parsed)
}

/// Ask the service whether its model is loaded.
pub fn check_health(config: &ServiceConfig) -> Result<ServiceHealth, PredictionError> {
    let timeout = HEALTH_TIMEOUT.min(config.request_timeout);
    let response = match http_client::json_request("GET", &config.endpoint(HEALTH_PATH), timeout)
        .call()
    {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            return Err(PredictionError::Server {
                status: code,
                message: error_message(response),
            });
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(PredictionError::Transport(err.to_string()));
        }
    };
    let bytes = http_client::read_body(response, MAX_HEALTH_RESPONSE_BYTES)
        .map_err(|err| PredictionError::Body(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| PredictionError::MalformedBody(err.to_string()))
}

/// Endpoint the upload is posted to, depending on the threshold override.
pub fn predict_url(config: &ServiceConfig) -> String {
    if config.threshold.is_some() {
        config.endpoint(PREDICT_WITH_THRESHOLD_PATH)
    } else {
        config.endpoint(PREDICT_PATH)
    }
}

fn parse_prediction_body(bytes: &[u8]) -> Result<PredictionResponse, PredictionError> {
    serde_json::from_slice(bytes).map_err(|err| PredictionError::MalformedBody(err.to_string()))
}

fn error_message(response: ureq::Response) -> String {
    http_client::read_body(response, MAX_ERROR_RESPONSE_BYTES)
        .map(|bytes| error_message_from_body(&bytes))
        .unwrap_or_else(|_| FALLBACK_ERROR_MESSAGE.to_string())
}

/// Pull a non-empty string `detail` out of an error body.
fn error_message_from_body(bytes: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| match body.detail {
            Some(serde_json::Value::String(detail)) if !detail.trim().is_empty() => Some(detail),
            _ => None,
        })
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}
