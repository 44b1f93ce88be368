use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default chat-completions endpoint for the summarization service
pub const DEFAULT_SUMMARIZER_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub data_service: DataServiceConfig,
    pub summarizer: SummarizerConfig,
    pub security: SecurityConfig,
    pub views: ViewsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Public project URL and anonymous key of the hosted data service.
/// Both are safe to hand to a browser; row access is enforced upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataServiceConfig {
    pub url: String,
    pub anon_key: String,
}

/// Server-held summarization credentials. `api_key` is never rendered or
/// returned to a client; its absence only disables `/api/summarize`.
#[derive(Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    pub api_key: Option<String>,
    pub api_url: String,
}

impl std::fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secure_cookies: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

/// Lifetime of per-browser notes stores held in memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Stores untouched for this long are dropped
    pub idle_timeout_secs: u64,
    /// Open views kept per user; the least recently used goes first
    pub max_per_user: usize,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 30 * 60,
            max_per_user: 5,
        }
    }
}

impl ViewsConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let data_service = DataServiceConfig {
            url: require_any(&["DATA_SERVICE_URL", "SUPABASE_URL"], "DATA_SERVICE_URL")?,
            anon_key: require_any(
                &["DATA_SERVICE_ANON_KEY", "SUPABASE_ANON_KEY"],
                "DATA_SERVICE_ANON_KEY",
            )?,
        };

        url::Url::parse(&data_service.url).map_err(|_| ConfigError::Invalid {
            name: "DATA_SERVICE_URL",
            value: data_service.url.clone(),
        })?;

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(data_service),
            Environment::Staging => Self::staging(data_service),
            Environment::Development => Self::development(data_service),
        };

        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("AI_NOTES_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Summarizer overrides
        if let Ok(v) = env::var("GROQ_API_KEY") {
            if !v.trim().is_empty() {
                self.summarizer.api_key = Some(v);
            }
        }
        if let Ok(v) = env::var("SUMMARIZER_API_URL") {
            self.summarizer.api_url = v;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // View store overrides
        if let Some(secs) = env::var("VIEWS_IDLE_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()) {
            self.views.idle_timeout_secs = secs;
        }
        if let Some(max) = env::var("VIEWS_MAX_PER_USER")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|max| *max > 0)
        {
            self.views.max_per_user = max;
        }

        self
    }

    pub fn development(data_service: DataServiceConfig) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            data_service,
            summarizer: SummarizerConfig {
                api_key: None,
                api_url: DEFAULT_SUMMARIZER_API_URL.to_string(),
            },
            security: SecurityConfig {
                secure_cookies: false,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            views: ViewsConfig::default(),
        }
    }

    pub fn staging(data_service: DataServiceConfig) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            data_service,
            summarizer: SummarizerConfig {
                api_key: None,
                api_url: DEFAULT_SUMMARIZER_API_URL.to_string(),
            },
            security: SecurityConfig {
                secure_cookies: true,
                enable_cors: false,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            views: ViewsConfig::default(),
        }
    }

    pub fn production(data_service: DataServiceConfig) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            data_service,
            summarizer: SummarizerConfig {
                api_key: None,
                api_url: DEFAULT_SUMMARIZER_API_URL.to_string(),
            },
            security: SecurityConfig {
                secure_cookies: true,
                enable_cors: false,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            views: ViewsConfig::default(),
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn require_any(names: &[&str], reported: &'static str) -> Result<String, ConfigError> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(reported))
}
