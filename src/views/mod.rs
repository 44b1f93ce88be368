//! Server-rendered HTML for the login and notes pages.
//!
//! - `styles` - the stylesheet served at `/static/app.css`
//! - `login` - sign-in / sign-up form
//! - `notes` - note grid and dialogs, rendered from a `NotesState` snapshot

pub mod login;
pub mod notes;
pub mod styles;

use chrono::{DateTime, Utc};

pub use login::render_login;
pub use notes::render_notes;
pub use styles::APP_CSS;

pub const STYLESHEET_PATH: &str = "/static/app.css";

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// e.g. `May  1, 2024`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %e, %Y").to_string()
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{css}">
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
        css = STYLESHEET_PATH,
        body = body,
    )
}
