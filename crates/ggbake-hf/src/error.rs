//! Internal error types for Hugging Face operations.
//!
//! These errors are internal to `ggbake-hf` and are mapped to core registry
//! errors at the port boundary.

use thiserror::Error;

/// Result type alias for Hugging Face operations.
pub type HfResult<T> = Result<T, HfError>;

/// Errors related to Hugging Face Hub operations.
#[derive(Debug, Error)]
pub enum HfError {
    /// API request failed with an HTTP error status.
    #[error("Hub request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from Hub: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local file I/O error while writing a download.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl HfError {
    /// HTTP status of the failed request, when there was one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_error_message() {
        let error = HfError::RequestFailed {
            status: 404,
            url: "https://huggingface.co/api/models/org/missing/tree/main".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("org/missing"));
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_invalid_response_error_message() {
        let error = HfError::InvalidResponse {
            message: "Expected array for tree response".to_string(),
        };
        assert!(error.to_string().contains("Expected array"));
        assert_eq!(error.status(), None);
    }
}
