//! Transport for the prediction service.
//!
//! One pooled agent serves every call. Each request carries its own deadline
//! from [`ServiceConfig`](crate::config::ServiceConfig), and bodies are read
//! under a byte cap because heatmap responses run to megabytes.

use std::io::{self, Read};
use std::sync::OnceLock;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub(crate) enum BodyError {
    #[error("response exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .build()
    })
}

/// JSON request whose whole round trip must finish within `timeout`.
pub(crate) fn json_request(method: &str, url: &str, timeout: Duration) -> ureq::Request {
    agent()
        .request(method, url)
        .timeout(timeout)
        .set("Accept", "application/json")
}

/// Read a response body, failing once it passes `limit` bytes.
pub(crate) fn read_body(response: ureq::Response, limit: usize) -> Result<Vec<u8>, BodyError> {
    let declared = response
        .header("Content-Length")
        .and_then(|value| value.trim().parse::<u64>().ok());
    if declared.is_some_and(|length| length > limit as u64) {
        return Err(BodyError::TooLarge { limit });
    }
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut bytes)?;
    if bytes.len() > limit {
        return Err(BodyError::TooLarge { limit });
    }
    Ok(bytes)
}
