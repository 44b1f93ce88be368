// handlers/public/login.rs - GET/POST /login
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth_form::{AuthForm, AuthMode};
use crate::middleware::{store_session_cookies, LOGIN_PATH};
use crate::server::AppState;
use crate::views::render_login;

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub mode: AuthMode,
}

/// GET /login?mode=signin|signup
pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    Html(render_login(&AuthForm::new(query.mode)))
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login - sign in or sign up depending on `mode`.
///
/// A successful sign-in stores the token cookies and redirects back to
/// `/login`, where the session gate forwards to the notes page. Every other
/// outcome re-renders the form.
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut auth = AuthForm::with_credentials(form.mode, form.email, form.password);

    match auth.submit(state.identity.as_ref()).await {
        Some(session) => {
            let jar = store_session_cookies(jar, &session, state.config.security.secure_cookies);
            (jar, Redirect::to(LOGIN_PATH)).into_response()
        }
        None => Html(render_login(&auth)).into_response(),
    }
}
