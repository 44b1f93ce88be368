// handlers/protected/mod.rs - Handlers behind the session gate
//
// Every handler here can rely on a `CurrentSession` request extension;
// the gate redirects anonymous requests before they arrive.
pub mod notes;
pub mod session;
pub mod summarize;

pub use session::logout;
pub use summarize::summarize_post;
