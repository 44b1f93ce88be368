#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use ai_notes::client::ViewRegistry;
use ai_notes::config::{AppConfig, DataServiceConfig};
use ai_notes::{app, AppState};

pub const ANON_KEY: &str = "test-anon-key";
pub const API_KEY: &str = "gsk_test_key";

async fn spawn(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind mock on port {}", port))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

// ---------------------------------------------------------------------------
// Mock data service: identity + notes row API
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DataStore {
    accounts: HashMap<String, (String, Value)>,
    tokens: HashMap<String, Value>,
    refresh_tokens: HashMap<String, Value>,
    notes: Vec<Value>,
    fail_deletes: bool,
    calls: HashMap<&'static str, usize>,
}

type Shared = Arc<Mutex<DataStore>>;

#[derive(Clone)]
pub struct MockDataService {
    pub base_url: String,
    store: Shared,
}

impl MockDataService {
    pub async fn start() -> Result<Self> {
        let store: Shared = Arc::default();
        let router = Router::new()
            .route("/auth/v1/signup", post(signup))
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/user", get(user))
            .route("/auth/v1/logout", post(logout))
            .route(
                "/rest/v1/notes",
                get(list_notes)
                    .post(insert_note)
                    .patch(update_note)
                    .delete(delete_note),
            )
            .with_state(store.clone());

        let base_url = spawn(router).await?;
        Ok(Self { base_url, store })
    }

    pub fn register(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store.lock().unwrap().accounts.insert(
            email.to_string(),
            (password.to_string(), json!({ "id": id, "email": email })),
        );
        id
    }

    /// Invalidate every access token; refresh tokens stay valid
    pub fn expire_access_tokens(&self) {
        self.store.lock().unwrap().tokens.clear();
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.store.lock().unwrap().fail_deletes = fail;
    }

    pub fn notes(&self) -> Vec<Value> {
        self.store.lock().unwrap().notes.clone()
    }

    pub fn calls(&self, name: &str) -> usize {
        self.store.lock().unwrap().calls.get(name).copied().unwrap_or(0)
    }
}

fn count(store: &mut DataStore, name: &'static str) {
    *store.calls.entry(name).or_default() += 1;
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// Check the anon key and resolve the bearer token to a user
fn authorize(store: &DataStore, headers: &HeaderMap) -> Result<Value, Response> {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    if apikey != Some(ANON_KEY) {
        return Err(error(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "No API key found in request" }),
        ));
    }

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    store.tokens.get(token).cloned().ok_or_else(|| {
        error(
            StatusCode::UNAUTHORIZED,
            json!({ "code": 401, "msg": "invalid JWT: unable to parse or verify signature" }),
        )
    })
}

fn issue_session(store: &mut DataStore, user: Value) -> Value {
    let access = format!("access-{}", Uuid::new_v4().simple());
    let refresh = format!("refresh-{}", Uuid::new_v4().simple());
    store.tokens.insert(access.clone(), user.clone());
    store.refresh_tokens.insert(refresh.clone(), user.clone());
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "expires_in": 3600,
        "token_type": "bearer",
        "user": user
    })
}

async fn signup(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    count(&mut store, "signup");
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    if store.accounts.contains_key(&email) {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "code": 422, "msg": "User already registered" }),
        );
    }

    let user = json!({ "id": Uuid::new_v4(), "email": email });
    store.accounts.insert(email, (password, user.clone()));
    Json(user).into_response()
}

async fn token(
    State(store): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    match query.get("grant_type").map(String::as_str) {
        Some("password") => {
            count(&mut store, "sign_in");
            let email = body["email"].as_str().unwrap_or_default();
            let password = body["password"].as_str().unwrap_or_default();
            match store.accounts.get(email).cloned() {
                Some((expected, user)) if expected == password => {
                    Json(issue_session(&mut store, user)).into_response()
                }
                _ => error(
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
                ),
            }
        }
        Some("refresh_token") => {
            count(&mut store, "refresh");
            let refresh = body["refresh_token"].as_str().unwrap_or_default();
            match store.refresh_tokens.remove(refresh) {
                Some(user) => Json(issue_session(&mut store, user)).into_response(),
                None => error(
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "invalid_grant", "error_description": "Invalid Refresh Token: Refresh Token Not Found" }),
                ),
            }
        }
        _ => error(
            StatusCode::BAD_REQUEST,
            json!({ "error": "unsupported_grant_type" }),
        ),
    }
}

async fn user(State(store): State<Shared>, headers: HeaderMap) -> Response {
    let mut store = store.lock().unwrap();
    count(&mut store, "get_user");
    match authorize(&store, &headers) {
        Ok(user) => Json(user).into_response(),
        Err(response) => response,
    }
}

async fn logout(State(store): State<Shared>, headers: HeaderMap) -> Response {
    let mut store = store.lock().unwrap();
    count(&mut store, "sign_out");
    if let Err(response) = authorize(&store, &headers) {
        return response;
    }
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();
    store.tokens.remove(&token);
    StatusCode::NO_CONTENT.into_response()
}

fn id_filter(query: &HashMap<String, String>) -> Option<String> {
    query
        .get("id")
        .and_then(|v| v.strip_prefix("eq."))
        .map(str::to_string)
}

fn wants_single_object(headers: &HeaderMap) -> bool {
    headers.get(header::ACCEPT).and_then(|v| v.to_str().ok())
        == Some("application/vnd.pgrst.object+json")
        && headers.get("prefer").and_then(|v| v.to_str().ok()) == Some("return=representation")
}

async fn list_notes(
    State(store): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut store = store.lock().unwrap();
    count(&mut store, "list");
    let user = match authorize(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    assert_eq!(query.get("order").map(String::as_str), Some("created_at.desc"));

    let mut notes: Vec<Value> = store
        .notes
        .iter()
        .filter(|n| n["user_id"] == user["id"])
        .cloned()
        .collect();
    notes.sort_by(|a, b| {
        b["created_at"]
            .as_str()
            .unwrap_or_default()
            .cmp(a["created_at"].as_str().unwrap_or_default())
    });
    Json(notes).into_response()
}

async fn insert_note(State(store): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    count(&mut store, "create");
    let user = match authorize(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if !wants_single_object(&headers) {
        return error(StatusCode::BAD_REQUEST, json!({ "message": "expected single object" }));
    }
    if body["user_id"] != user["id"] {
        return error(
            StatusCode::FORBIDDEN,
            json!({ "code": "42501", "message": "new row violates row-level security policy for table \"notes\"" }),
        );
    }

    // Strictly increasing timestamps keep ordering deterministic
    let created_at = chrono::Utc::now() + chrono::Duration::milliseconds(store.notes.len() as i64);
    let note = json!({
        "id": Uuid::new_v4(),
        "title": body["title"],
        "content": body["content"],
        "created_at": created_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        "user_id": user["id"]
    });
    store.notes.push(note.clone());
    (StatusCode::CREATED, Json(note)).into_response()
}

async fn update_note(
    State(store): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    count(&mut store, "update");
    let user = match authorize(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if !wants_single_object(&headers) {
        return error(StatusCode::BAD_REQUEST, json!({ "message": "expected single object" }));
    }
    let id = id_filter(&query).unwrap_or_default();

    let note = store
        .notes
        .iter_mut()
        .find(|n| n["id"].as_str() == Some(id.as_str()) && n["user_id"] == user["id"]);
    match note {
        Some(note) => {
            note["title"] = body["title"].clone();
            note["content"] = body["content"].clone();
            Json(note.clone()).into_response()
        }
        None => error(
            StatusCode::NOT_ACCEPTABLE,
            json!({ "code": "PGRST116", "message": "JSON object requested, multiple (or no) rows returned" }),
        ),
    }
}

async fn delete_note(
    State(store): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut store = store.lock().unwrap();
    count(&mut store, "delete");
    let user = match authorize(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if store.fail_deletes {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "could not delete note" }),
        );
    }
    let id = id_filter(&query).unwrap_or_default();
    store
        .notes
        .retain(|n| !(n["id"].as_str() == Some(id.as_str()) && n["user_id"] == user["id"]));
    StatusCode::NO_CONTENT.into_response()
}

// ---------------------------------------------------------------------------
// Mock chat-completions service
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub enum CompletionReply {
    Text(String),
    Empty,
    Status(u16, String),
}

struct CompletionStore {
    reply: CompletionReply,
    requests: Vec<(Option<String>, Value)>,
}

#[derive(Clone)]
pub struct MockCompletions {
    pub url: String,
    store: Arc<Mutex<CompletionStore>>,
}

impl MockCompletions {
    pub async fn start(reply: CompletionReply) -> Result<Self> {
        let store = Arc::new(Mutex::new(CompletionStore {
            reply,
            requests: Vec::new(),
        }));
        let router = Router::new()
            .route("/openai/v1/chat/completions", post(complete))
            .with_state(store.clone());
        let base_url = spawn(router).await?;
        Ok(Self {
            url: format!("{}/openai/v1/chat/completions", base_url),
            store,
        })
    }

    pub fn set_reply(&self, reply: CompletionReply) {
        self.store.lock().unwrap().reply = reply;
    }

    /// (authorization header, JSON body) of every request received
    pub fn requests(&self) -> Vec<(Option<String>, Value)> {
        self.store.lock().unwrap().requests.clone()
    }
}

async fn complete(
    State(store): State<Arc<Mutex<CompletionStore>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    store.requests.push((auth, body));

    match store.reply.clone() {
        CompletionReply::Text(text) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        CompletionReply::Empty => Json(json!({ "choices": [] })).into_response(),
        CompletionReply::Status(code, body) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
    }
}

// ---------------------------------------------------------------------------
// Application under test
// ---------------------------------------------------------------------------

/// Honour RUST_LOG in tests; output goes through the test harness capture
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestApp {
    pub router: Router,
    pub views: ViewRegistry,
    pub data: MockDataService,
    pub completions: MockCompletions,
}

impl TestApp {
    pub async fn start() -> Result<Self> {
        Self::start_with(Some(API_KEY)).await
    }

    pub async fn start_with(api_key: Option<&str>) -> Result<Self> {
        init_tracing();
        let data = MockDataService::start().await?;
        let completions = MockCompletions::start(CompletionReply::Text("Buy milk and eggs.".into())).await?;

        let mut config = AppConfig::development(DataServiceConfig {
            url: data.base_url.clone(),
            anon_key: ANON_KEY.to_string(),
        });
        config.summarizer.api_key = api_key.map(str::to_string);
        config.summarizer.api_url = completions.url.clone();

        let state = AppState::from_config(config)?;
        Ok(Self {
            views: state.views.clone(),
            router: app(state),
            data,
            completions,
        })
    }

    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            cookies: HashMap::new(),
        }
    }

    /// Browser that has registered, signed in as `email` and opened the notes page
    pub async fn signed_in(&self, email: &str) -> Result<Browser> {
        self.data.register(email, "correct horse");
        let mut browser = self.browser();
        let res = browser
            .post_form("/login", &[("mode", "signin"), ("email", email), ("password", "correct horse")])
            .await?;
        anyhow::ensure!(res.status == StatusCode::SEE_OTHER, "sign in failed: {}", res.body);
        let res = browser.get("/").await?;
        anyhow::ensure!(res.status == StatusCode::OK, "notes page returned {}", res.status);
        Ok(browser)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Minimal cookie-carrying client driving the router with `oneshot`
pub struct Browser {
    router: Router,
    pub cookies: HashMap<String, String>,
}

impl Browser {
    pub async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> Result<TestResponse> {
        let cookie_header: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        let builder = if cookie_header.is_empty() {
            builder
        } else {
            builder.header(header::COOKIE, cookie_header.join("; "))
        };

        let response = self.router.clone().oneshot(builder.body(body)?).await?;

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str()?;
            let mut parts = set_cookie.split(';').map(str::trim);
            let Some((name, value)) = parts.next().and_then(|kv| kv.split_once('=')) else {
                continue;
            };
            let removed = parts.any(|p| p.eq_ignore_ascii_case("Max-Age=0"));
            if removed || value.is_empty() {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub async fn get(&mut self, path: &str) -> Result<TestResponse> {
        self.send(Request::get(path), Body::empty()).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Result<TestResponse> {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::post(path).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(encoded),
        )
        .await
    }

    pub async fn post_json(&mut self, path: &str, body: &Value) -> Result<TestResponse> {
        self.send(
            Request::post(path).header(header::CONTENT_TYPE, "application/json"),
            Body::from(body.to_string()),
        )
        .await
    }

    pub async fn post_raw_json(&mut self, path: &str, body: &str) -> Result<TestResponse> {
        self.send(
            Request::post(path).header(header::CONTENT_TYPE, "application/json"),
            Body::from(body.to_string()),
        )
        .await
    }
}
