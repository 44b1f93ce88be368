//! Wire types for the OpenAI-compatible chat-completions API.

use serde::{Deserialize, Serialize};

pub const MODEL: &str = "llama3-8b-8192";
pub const MAX_TOKENS: u32 = 100;
pub const TEMPERATURE: f32 = 0.5;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes text concisely.";
pub const USER_INSTRUCTION: &str = "Summarize the following text concisely:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    /// The fixed two-turn summarization prompt around `content`
    pub fn summarize(content: &str) -> Self {
        Self {
            model: MODEL.to_string(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(user_prompt(content)),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

/// Instruction, blank line, then the note text untouched
pub fn user_prompt(content: &str) -> String {
    format!("{}\n\n{}", USER_INSTRUCTION, content)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Trimmed text of the first completion, if there is any
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
