//! Persisted settings and prediction-service resolution.
//!
//! Settings live in `config.toml` inside the app directory. The service base
//! URL resolves, in order, from the `XRAYSCOPE_API_URL` environment variable,
//! the config file, the URL baked in at build time, and finally
//! [`DEFAULT_API_BASE_URL`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, de::Error as SerdeDeError};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Local development endpoint used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
/// Environment variable that overrides the prediction service URL.
pub const API_URL_ENV: &str = "XRAYSCOPE_API_URL";
/// Cap applied to prediction responses (base64 heatmaps make them large).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Upper bound on one prediction round trip; Grad-CAM for every disease is slow.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const BUILD_API_URL: Option<&str> = option_env!("XRAYSCOPE_BUILD_API_URL");

/// Settings stored in the TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// `[service]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceSettings {
    /// Base URL of the prediction service, without the endpoint path.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Custom decision threshold; when set, uploads go to the threshold endpoint.
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub max_response_bytes: Option<usize>,
    /// Seconds to wait for a prediction before giving up.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// `[logging]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive such as `"debug"` or `"xrayscope=trace"`; `RUST_LOG` wins.
    #[serde(default)]
    pub level: Option<String>,
    /// Number of per-launch log files kept, the current one included.
    #[serde(default)]
    pub max_files: Option<usize>,
}

/// Resolved, validated connection settings injected into the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_base_url: String,
    pub threshold: Option<f64>,
    pub max_response_bytes: usize,
    pub request_timeout: Duration,
}

impl ServiceConfig {
    /// Validate and normalize a base URL into a config with default limits.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url)?,
            threshold: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Attach a threshold override after checking it lies in `[0, 1]`.
    pub fn with_threshold(mut self, threshold: Option<f64>) -> Result<Self, ConfigError> {
        if let Some(value) = threshold
            && !(0.0..=1.0).contains(&value)
        {
            return Err(ConfigError::InvalidThreshold(value));
        }
        self.threshold = threshold;
        Ok(self)
    }

    /// Join the base URL with an endpoint path such as `/predict`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            threshold: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config TOML at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid service URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("Service URL '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("Threshold {0} must be between 0.0 and 1.0")]
    InvalidThreshold(f64),
    #[error("Request timeout must be at least one second")]
    ZeroTimeout,
}

/// Resolve the configuration file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_file(CONFIG_FILE_NAME)?)
}

/// Load configuration from disk, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    load_from(&path)
}

/// Load configuration from a specific path, returning defaults if missing.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the service config using the process environment for overrides.
pub fn resolve_service(config: &AppConfig) -> Result<ServiceConfig, ConfigError> {
    let env_url = std::env::var(API_URL_ENV).ok();
    resolve_service_with(config, env_url.as_deref())
}

fn resolve_service_with(
    config: &AppConfig,
    env_url: Option<&str>,
) -> Result<ServiceConfig, ConfigError> {
    let base = [env_url, config.service.api_base_url.as_deref(), BUILD_API_URL]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
        .unwrap_or(DEFAULT_API_BASE_URL);
    let mut service = ServiceConfig::new(base)?.with_threshold(config.service.threshold)?;
    if let Some(max) = config.service.max_response_bytes {
        service.max_response_bytes = max;
    }
    match config.service.timeout_secs {
        Some(0) => return Err(ConfigError::ZeroTimeout),
        Some(secs) => service.request_timeout = Duration::from_secs(secs),
        None => {}
    }
    Ok(service)
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
