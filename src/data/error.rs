use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors from the hosted data service (row API and identity API)
#[derive(Debug, Error)]
pub enum DataServiceError {
    /// The service answered with a non-success status. `message` is taken from
    /// the service's own error payload when it carries one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request to data service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected data service response: {0}")]
    Decode(String),

    #[error("Invalid data service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl DataServiceError {
    /// Build an API error from a failed response body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
        });

        DataServiceError::Api {
            status: status.as_u16(),
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DataServiceError::Api { status, .. } => Some(*status),
            DataServiceError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the service rejected the presented token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Human-readable message for the UI: the service's own message when it
    /// sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            DataServiceError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Identity errors use `msg` / `error_description`, row errors use `message`
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    ["msg", "message", "error_description", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
