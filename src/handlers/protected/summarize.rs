// handlers/protected/summarize.rs - POST /api/summarize
//
// Input:  { "content": "note text" }
// Output: 200 { "summary": "..." }
//         400/500 { "error": "...", "code": "..." }
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::server::AppState;
use crate::summarize::SummarizeError;

pub async fn summarize_post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    // Misconfiguration is reported ahead of any input problem
    if !state.summarizer.is_configured() {
        tracing::error!("Summarizer API key is not configured");
        return Err(SummarizeError::MissingApiKey.into());
    }

    let content = match payload {
        Ok(Json(body)) => body
            .get("content")
            .and_then(Value::as_str)
            .filter(|content| !content.is_empty())
            .map(str::to_string),
        Err(rejection) => {
            tracing::warn!("Rejected summarize body: {}", rejection);
            None
        }
    };

    let Some(content) = content else {
        return Err(SummarizeError::InvalidContent.into());
    };

    let summary = state.summarizer.summarize(&content).await.map_err(|e| {
        tracing::error!("Error in summarize API route: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(json!({ "summary": summary })))
}
