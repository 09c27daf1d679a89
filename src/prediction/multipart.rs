//! Minimal `multipart/form-data` encoder for file uploads.

use uuid::Uuid;

const CRLF: &str = "\r\n";

/// In-memory multipart body with a random boundary.
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("xrayscope-{}", Uuid::new_v4().simple()))
    }

    pub(crate) fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a file part.
    pub fn add_file(
        &mut self,
        field: &str,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> &mut Self {
        let header = format!(
            "--{boundary}{CRLF}Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"{CRLF}Content-Type: {content_type}{CRLF}{CRLF}",
            boundary = self.boundary,
            field = escape_quoted(field),
            filename = escape_quoted(filename),
        );
        self.body.extend_from_slice(header.as_bytes());
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(CRLF.as_bytes());
        self
    }

    /// Close the body with the terminating boundary.
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--{CRLF}", self.boundary).as_bytes());
        self.body
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent-encode quotes and drop line breaks, as browsers do for form filenames.
fn escape_quoted(value: &str) -> String {
    value
        .chars()
        .filter(|ch| *ch != '\r' && *ch != '\n')
        .map(|ch| match ch {
            '"' => "%22".to_string(),
            other => other.to_string(),
        })
        .collect()
}
