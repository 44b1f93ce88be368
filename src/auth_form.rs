use serde::{Deserialize, Serialize};

use crate::data::{Credentials, IdentityProvider, Session};

pub const SIGN_UP_SUCCESS_MESSAGE: &str =
    "Sign up successful! Please check your email to confirm your account.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::SignIn => "signin",
            AuthMode::SignUp => "signup",
        }
    }
}

/// State of the login page form
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl std::fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthForm")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("error", &self.error)
            .field("message", &self.message)
            .finish()
    }
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_credentials(mode: AuthMode, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode,
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Switch between sign-in and sign-up, clearing fields and messages
    pub fn toggle_mode(&mut self) {
        *self = Self::new(self.mode.toggled());
    }

    /// Submit the form in its current mode.
    ///
    /// Returns the new session on a successful sign-in; the form itself is
    /// left unchanged in that case. Sign-up never yields a session.
    pub async fn submit(&mut self, identity: &dyn IdentityProvider) -> Option<Session> {
        self.error = None;
        self.message = None;

        let credentials = Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        };

        match self.mode {
            AuthMode::SignUp => match identity.sign_up(&credentials).await {
                Ok(()) => {
                    tracing::info!(email = %credentials.email, "Sign up accepted");
                    *self = Self::new(AuthMode::SignIn);
                    self.message = Some(SIGN_UP_SUCCESS_MESSAGE.to_string());
                    None
                }
                Err(e) => {
                    tracing::warn!(email = %credentials.email, "Sign up failed: {}", e);
                    self.error = Some(e.to_string());
                    None
                }
            },
            AuthMode::SignIn => match identity.sign_in_with_password(&credentials).await {
                Ok(session) => {
                    tracing::info!(user = %session.user.id, "Signed in");
                    Some(session)
                }
                Err(e) => {
                    tracing::warn!(email = %credentials.email, "Sign in failed: {}", e);
                    self.error = Some(e.to_string());
                    None
                }
            },
        }
    }
}
