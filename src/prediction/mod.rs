//! Client for the remote chest X-ray prediction service.
//!
//! The service exposes `POST /predict` (multipart upload, field `file`),
//! `POST /predict-with-threshold`, and `GET /health`.

pub mod api;
pub mod multipart;
pub mod response;

pub use api::{FALLBACK_ERROR_MESSAGE, PredictionError, check_health, submit};
pub use response::{DEFAULT_THRESHOLD, PredictionResponse, ProbabilityMap, ServiceHealth};
