//! Library exports for the X-ray analysis client and its tests.
/// Application directory resolution.
pub mod app_dirs;
/// Persistent settings and service endpoint resolution.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
pub(crate) mod http_client;
/// Image validation and decoding.
pub mod image_file;
/// File and stdout logging setup.
pub mod logging;
/// Prediction service client.
pub mod prediction;

#[cfg(test)]
mod test_support;
