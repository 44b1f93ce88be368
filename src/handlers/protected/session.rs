// handlers/protected/session.rs - POST /logout
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::client::ViewKey;
use crate::data::CurrentSession;
use crate::middleware::{clear_session_cookies, LOGIN_PATH};
use crate::server::AppState;

use super::notes::{view_id, VIEW_COOKIE};

/// Sign out with the identity API, then forget the local session whether
/// or not that call succeeded.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
) -> Response {
    if let Err(e) = state.identity.sign_out(&session.access_token).await {
        tracing::warn!(user = %session.user.id, "Error signing out: {}", e);
    }

    if let Some(view) = view_id(&jar) {
        state
            .views
            .remove(&ViewKey {
                view,
                user: session.user.id,
            })
            .await;
    }

    tracing::info!(user = %session.user.id, "Signed out");

    let jar = clear_session_cookies(jar).remove(Cookie::build(VIEW_COOKIE).path("/"));
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}
