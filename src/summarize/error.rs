use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the summarize proxy. Display strings are returned verbatim
/// to the caller in the `error` field.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("API key not configured.")]
    MissingApiKey,

    #[error("Invalid note content provided.")]
    InvalidContent,

    #[error("API request failed with status {status}: {reason}. {body}")]
    Upstream {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Failed to extract summary from API response.")]
    Extraction,

    #[error("Failed to parse API response: {0}")]
    Decode(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl SummarizeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SummarizeError::InvalidContent => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
