use async_trait::async_trait;

use crate::config::SummarizerConfig;

use super::completion::{ChatRequest, ChatResponse};
use super::error::SummarizeError;

/// Produces a short summary of note text
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Whether a request could be attempted at all. Checked before input
    /// validation so misconfiguration is reported for every request.
    fn is_configured(&self) -> bool {
        true
    }

    async fn summarize(&self, content: &str) -> Result<String, SummarizeError>;
}

/// Server-side proxy to the summarization service.
///
/// Holds the service credential so it never reaches a browser. One request
/// per call: no retries, no caching, no client-side timeout.
#[derive(Clone)]
pub struct SummarizeProxy {
    http: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
}

impl SummarizeProxy {
    pub fn new(config: &SummarizerConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &SummarizerConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for SummarizeProxy {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn summarize(&self, content: &str) -> Result<String, SummarizeError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("Summarizer API key is not configured");
            return Err(SummarizeError::MissingApiKey);
        };

        if content.is_empty() {
            return Err(SummarizeError::InvalidContent);
        }

        let request = ChatRequest::summarize(content);

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Summarizer API error: {} {}", status, body);
            return Err(SummarizeError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Decode(e.to_string()))?;

        match completion.first_text() {
            Some(summary) => Ok(summary.to_string()),
            None => {
                tracing::error!("Could not extract summary from API response: {:?}", completion);
                Err(SummarizeError::Extraction)
            }
        }
    }
}
