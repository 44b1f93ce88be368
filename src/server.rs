use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::client::{NotesClient, Store, ViewKey, ViewRegistry};
use crate::config::AppConfig;
use crate::data::{CurrentSession, DataService, DataServiceError, IdentityProvider, NotesRepository};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::session_gate;
use crate::summarize::{SummarizeProxy, Summarizer};

/// Shared application state. Collaborators are trait objects so tests can
/// substitute in-memory or mock-server backed implementations.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub notes: Arc<dyn NotesRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub summarizer: Arc<dyn Summarizer>,
    pub views: ViewRegistry,
}

impl AppState {
    /// Wire the real HTTP collaborators from configuration
    pub fn from_config(config: AppConfig) -> Result<Self, DataServiceError> {
        let data = Arc::new(DataService::new(&config.data_service)?);
        let summarizer = Arc::new(SummarizeProxy::new(&config.summarizer));
        Ok(Self::new(config, data.clone(), data, summarizer))
    }

    pub fn new(
        config: AppConfig,
        notes: Arc<dyn NotesRepository>,
        identity: Arc<dyn IdentityProvider>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        let views = ViewRegistry::new(&config.views);
        Self {
            config: Arc::new(config),
            notes,
            identity,
            summarizer,
            views,
        }
    }

    /// Controller bound to the store of one browser session
    pub async fn notes_client(&self, key: ViewKey, session: CurrentSession) -> NotesClient {
        let store = self.views.get_or_create(key).await;
        self.client_for(store, session)
    }

    /// Controller over a throwaway store, for requests that carry no view
    pub fn detached_client(&self, session: CurrentSession) -> NotesClient {
        self.client_for(Arc::new(Store::new()), session)
    }

    fn client_for(&self, store: Arc<Store>, session: CurrentSession) -> NotesClient {
        NotesClient::new(store, self.notes.clone(), self.summarizer.clone(), session)
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/health", get(public::health))
        .route("/static/app.css", get(public::stylesheet))
        .route("/login", get(public::login_page).post(public::login_submit))
        // Session-gated pages
        .merge(notes_routes())
        .route("/logout", post(protected::logout))
        .route("/api/summarize", post(protected::summarize_post))
        .fallback(not_found)
        // Global middleware
        .layer(from_fn_with_state(state.clone(), session_gate))
        .layer(TraceLayer::new_for_http());

    let router = match cors_layer(&state.config) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

fn notes_routes() -> Router<AppState> {
    use protected::notes;

    Router::new()
        .route("/", get(notes::notes_page))
        .route("/notes", post(notes::create_note))
        .route("/notes/:id", post(notes::update_note))
        .route("/notes/:id/delete", post(notes::delete_note))
        .route("/notes/:id/summarize", post(notes::summarize_note))
        .route("/ui", post(notes::ui_action))
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
