// handlers/public/assets.rs - GET /static/app.css
use axum::{http::header, response::IntoResponse};

use crate::views::APP_CSS;

pub async fn stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        APP_CSS,
    )
}
