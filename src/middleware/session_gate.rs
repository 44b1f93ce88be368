use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::data::{CurrentSession, IdentityProvider, Session};
use crate::server::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "notes_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "notes_refresh_token";

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Paths only meaningful without a session
const PUBLIC_ONLY_PATHS: &[&str] = &[LOGIN_PATH];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// Routing policy: anonymous users may only reach public-only pages,
/// signed-in users may not reach them.
pub fn decide(path: &str, user_present: bool) -> GateDecision {
    let public_only = PUBLIC_ONLY_PATHS.contains(&path);

    match (public_only, user_present) {
        (false, false) => GateDecision::Redirect(LOGIN_PATH),
        (true, true) => GateDecision::Redirect(HOME_PATH),
        _ => GateDecision::Allow,
    }
}

/// Static assets and the liveness probe bypass the gate
pub fn is_excluded(path: &str) -> bool {
    path.starts_with("/static/") || path == "/favicon.ico" || path == "/health"
}

/// Session gate middleware: resolves the current user from the token
/// cookies, refreshing them when the access token has expired, then applies
/// `decide`.
pub async fn session_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_excluded(&path) {
        return next.run(request).await;
    }

    let secure = state.config.security.secure_cookies;
    let (jar, refreshed, session) = resolve_session(state.identity.as_ref(), jar, secure).await;

    match decide(&path, session.is_some()) {
        GateDecision::Redirect(to) => {
            if session.is_some() {
                tracing::info!("Redirecting authenticated user to {} from: {}", to, path);
            } else {
                tracing::info!("Redirecting unauthenticated user to {} from: {}", to, path);
            }
            (jar, Redirect::to(to)).into_response()
        }
        GateDecision::Allow => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            let response = next.run(request).await;

            // A handler that rewrote the token cookies itself (sign-out) wins
            if refreshed && !sets_cookie(&response, ACCESS_TOKEN_COOKIE) {
                (jar, response).into_response()
            } else {
                response
            }
        }
    }
}

/// Returns the (possibly rewritten) jar, whether the jar changed, and the
/// session if a user is present.
async fn resolve_session(
    identity: &dyn IdentityProvider,
    jar: CookieJar,
    secure: bool,
) -> (CookieJar, bool, Option<CurrentSession>) {
    let access = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string());
    let refresh = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());

    if let Some(access_token) = access {
        match identity.get_user(&access_token).await {
            Ok(user) => return (jar, false, Some(CurrentSession { user, access_token })),
            Err(e) if e.is_unauthorized() => {
                tracing::debug!("Access token rejected, attempting refresh: {}", e);
            }
            Err(e) => {
                tracing::warn!("Identity lookup failed: {}", e);
                return (jar, false, None);
            }
        }
    }

    let Some(refresh_token) = refresh else {
        return (jar, false, None);
    };

    match identity.refresh_session(&refresh_token).await {
        Ok(session) => {
            tracing::debug!(user = %session.user.id, "Session refreshed");
            let jar = store_session_cookies(jar, &session, secure);
            (jar, true, Some(session.into()))
        }
        Err(e) => {
            tracing::debug!("Session refresh failed: {}", e);
            (clear_session_cookies(jar), true, None)
        }
    }
}

fn sets_cookie(response: &Response, name: &str) -> bool {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn store_session_cookies(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_TOKEN_COOKIE, session.access_token.clone(), secure))
        .add(session_cookie(REFRESH_TOKEN_COOKIE, session.refresh_token.clone(), secure))
}

pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"))
}
