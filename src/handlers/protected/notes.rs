// handlers/protected/notes.rs - Notes page and its form actions
//
// Each POST dispatches through the session's NotesClient and redirects
// back to `/` (post/redirect/get); the page renders the latest snapshot.
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use uuid::Uuid;

use crate::client::{NotesClient, ViewKey};
use crate::data::CurrentSession;
use crate::error::ApiError;
use crate::middleware::HOME_PATH;
use crate::server::AppState;
use crate::views::render_notes;

/// Identifies the browser session's notes store
pub const VIEW_COOKIE: &str = "notes_view";

/// Id of this browser's notes view, if it has one
pub fn view_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(VIEW_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Resolve the client for this browser session, issuing a view cookie on
/// first contact. Only page loads call this.
async fn page_client(state: &AppState, jar: CookieJar, session: CurrentSession) -> (CookieJar, NotesClient) {
    let (jar, view) = match view_id(&jar) {
        Some(view) => (jar, view),
        None => {
            let view = Uuid::new_v4();
            let cookie = Cookie::build((VIEW_COOKIE, view.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.config.security.secure_cookies)
                .build();
            (jar.add(cookie), view)
        }
    };

    let key = ViewKey {
        view,
        user: session.user.id,
    };
    (jar, state.notes_client(key, session).await)
}

/// Client for a form action. Without a view cookie the action still runs
/// against the data service, but its outcome lands in a throwaway store and
/// no view is registered.
async fn action_client(state: &AppState, jar: &CookieJar, session: CurrentSession) -> NotesClient {
    match view_id(jar) {
        Some(view) => {
            let key = ViewKey {
                view,
                user: session.user.id,
            };
            state.notes_client(key, session).await
        }
        None => {
            tracing::debug!(user = %session.user.id, "Form action without a view cookie");
            state.detached_client(session)
        }
    }
}

fn back_home(jar: CookieJar) -> Response {
    (jar, Redirect::to(HOME_PATH)).into_response()
}

/// GET / - the notes page
pub async fn notes_page(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
) -> Response {
    let (jar, client) = page_client(&state, jar, session).await;
    client.load_if_needed().await;

    let html = render_notes(&client.snapshot(), &client.session().user);
    (jar, Html(html)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// POST /notes
pub async fn create_note(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
    Form(form): Form<NoteForm>,
) -> Response {
    let client = action_client(&state, &jar, session).await;
    client.create(&form.title, &form.content).await;
    back_home(jar)
}

/// POST /notes/:id
pub async fn update_note(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
    jar: CookieJar,
    Form(form): Form<NoteForm>,
) -> Response {
    let client = action_client(&state, &jar, session).await;
    client.update(id, &form.title, &form.content).await;
    back_home(jar)
}

/// POST /notes/:id/delete - confirms a delete opened through `/ui`
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
    jar: CookieJar,
) -> Response {
    let client = action_client(&state, &jar, session).await;
    client.confirm_delete(id).await;
    back_home(jar)
}

/// POST /notes/:id/summarize
pub async fn summarize_note(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
    jar: CookieJar,
) -> Response {
    let client = action_client(&state, &jar, session).await;
    client.summarize(id).await;
    back_home(jar)
}

#[derive(Debug, Deserialize)]
pub struct UiForm {
    pub action: String,
    #[serde(default)]
    pub id: Option<Uuid>,
}

/// POST /ui - dialog open/close actions that touch no collaborator
pub async fn ui_action(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
    Form(form): Form<UiForm>,
) -> Result<Response, ApiError> {
    let client = action_client(&state, &jar, session).await;
    let target = || form.id.ok_or_else(|| ApiError::bad_request("Missing note id"));

    match form.action.as_str() {
        "open_create" => client.open_create(),
        "close_create" => client.close_create(),
        "open_edit" => client.open_edit(target()?),
        "close_edit" => client.close_edit(),
        "open_delete" => client.open_delete(target()?),
        "close_delete" => client.close_delete(),
        "close_summary" => client.close_summary(),
        other => {
            return Err(ApiError::bad_request(format!("Unknown action: {}", other)));
        }
    }

    Ok(back_home(jar))
}
