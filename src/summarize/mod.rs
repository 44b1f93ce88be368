pub mod completion;
pub mod error;
pub mod proxy;

pub use completion::{ChatMessage, ChatRequest, ChatResponse};
pub use error::SummarizeError;
pub use proxy::{SummarizeProxy, Summarizer};
