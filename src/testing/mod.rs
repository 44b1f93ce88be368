//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::data::{
    Credentials, DataServiceError, IdentityProvider, NewNote, Note, NoteChanges, NotesRepository,
    Session, User,
};
use crate::summarize::{SummarizeError, Summarizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
    SignUp,
    SignIn,
    Refresh,
    GetUser,
    SignOut,
}

#[derive(Default)]
struct Inner {
    notes: Vec<Note>,
    accounts: HashMap<String, (String, User)>,
    tokens: HashMap<String, User>,
    refresh_tokens: HashMap<String, User>,
    failures: HashMap<Operation, String>,
    calls: HashMap<Operation, usize>,
    clock: i64,
}

/// Data service double: notes table plus identity API, with per-operation
/// failure injection and call counting.
#[derive(Default)]
pub struct MemoryDataService {
    inner: Mutex<Inner>,
}

impl MemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `op` fail with `message` until `recover` is called
    pub fn fail(&self, op: Operation, message: &str) {
        self.inner.lock().unwrap().failures.insert(op, message.to_string());
    }

    pub fn recover(&self, op: Operation) {
        self.inner.lock().unwrap().failures.remove(&op);
    }

    pub fn calls(&self, op: Operation) -> usize {
        self.inner.lock().unwrap().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn notes(&self) -> Vec<Note> {
        self.inner.lock().unwrap().notes.clone()
    }

    pub fn issue_token(&self, user: User) -> String {
        let token = format!("access-{}", Uuid::new_v4().simple());
        self.inner.lock().unwrap().tokens.insert(token.clone(), user);
        token
    }

    pub fn issue_refresh_token(&self, user: User) -> String {
        let token = format!("refresh-{}", Uuid::new_v4().simple());
        self.inner.lock().unwrap().refresh_tokens.insert(token.clone(), user);
        token
    }

    pub fn expire_token(&self, token: &str) {
        self.inner.lock().unwrap().tokens.remove(token);
    }

    pub fn register(&self, email: &str, password: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        self.inner
            .lock()
            .unwrap()
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Insert a note directly, bypassing tokens. Each seed is one minute
    /// newer than the previous.
    pub fn seed(&self, title: &str, content: &str, user_id: Uuid) -> Note {
        let mut inner = self.inner.lock().unwrap();
        let note = inner.next_note(title, content, user_id);
        inner.notes.push(note.clone());
        note
    }

    fn begin(&self, op: Operation) -> Result<(), DataServiceError> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(op).or_default() += 1;
        match inner.failures.get(&op) {
            Some(message) => Err(DataServiceError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn user_for(&self, token: &str) -> Result<User, DataServiceError> {
        self.inner
            .lock()
            .unwrap()
            .tokens
            .get(token)
            .cloned()
            .ok_or(DataServiceError::Api {
                status: 401,
                message: "invalid JWT".to_string(),
            })
    }

    fn session_for(&self, user: User) -> Session {
        Session {
            access_token: self.issue_token(user.clone()),
            refresh_token: self.issue_refresh_token(user.clone()),
            expires_in: Some(3600),
            token_type: Some("bearer".to_string()),
            user,
        }
    }
}

impl Inner {
    fn next_note(&mut self, title: &str, content: &str, user_id: Uuid) -> Note {
        self.clock += 1;
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: base + Duration::minutes(self.clock),
            user_id,
        }
    }
}

fn not_found() -> DataServiceError {
    DataServiceError::Api {
        status: 406,
        message: "JSON object requested, multiple (or no) rows returned".to_string(),
    }
}

#[async_trait]
impl NotesRepository for MemoryDataService {
    async fn list_notes(&self, access_token: &str) -> Result<Vec<Note>, DataServiceError> {
        self.begin(Operation::List)?;
        let user = self.user_for(access_token)?;
        let mut notes: Vec<Note> = self
            .notes()
            .into_iter()
            .filter(|note| note.user_id == user.id)
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn create_note(&self, access_token: &str, note: &NewNote) -> Result<Note, DataServiceError> {
        self.begin(Operation::Create)?;
        let user = self.user_for(access_token)?;
        if user.id != note.user_id {
            return Err(DataServiceError::Api {
                status: 403,
                message: "new row violates row-level security policy".to_string(),
            });
        }
        let mut inner = self.inner.lock().unwrap();
        let created = inner.next_note(&note.title, &note.content, note.user_id);
        inner.notes.push(created.clone());
        Ok(created)
    }

    async fn update_note(
        &self,
        access_token: &str,
        id: Uuid,
        changes: &NoteChanges,
    ) -> Result<Note, DataServiceError> {
        self.begin(Operation::Update)?;
        let user = self.user_for(access_token)?;
        let mut inner = self.inner.lock().unwrap();
        let note = inner
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user.id)
            .ok_or_else(not_found)?;
        note.title = changes.title.clone();
        note.content = changes.content.clone();
        Ok(note.clone())
    }

    async fn delete_note(&self, access_token: &str, id: Uuid) -> Result<(), DataServiceError> {
        self.begin(Operation::Delete)?;
        let user = self.user_for(access_token)?;
        self.inner
            .lock()
            .unwrap()
            .notes
            .retain(|n| !(n.id == id && n.user_id == user.id));
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MemoryDataService {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), DataServiceError> {
        self.begin(Operation::SignUp)?;
        if self.inner.lock().unwrap().accounts.contains_key(&credentials.email) {
            return Err(DataServiceError::Api {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        self.register(&credentials.email, &credentials.password);
        Ok(())
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, DataServiceError> {
        self.begin(Operation::SignIn)?;
        let account = self.inner.lock().unwrap().accounts.get(&credentials.email).cloned();
        match account {
            Some((password, user)) if password == credentials.password => Ok(self.session_for(user)),
            _ => Err(DataServiceError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, DataServiceError> {
        self.begin(Operation::Refresh)?;
        let user = self.inner.lock().unwrap().refresh_tokens.remove(refresh_token);
        match user {
            Some(user) => Ok(self.session_for(user)),
            None => Err(DataServiceError::Api {
                status: 400,
                message: "Invalid Refresh Token: Refresh Token Not Found".to_string(),
            }),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<User, DataServiceError> {
        self.begin(Operation::GetUser)?;
        self.user_for(access_token)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), DataServiceError> {
        self.begin(Operation::SignOut)?;
        self.expire_token(access_token);
        Ok(())
    }
}

/// Summarizer double that answers with a fixed text and records its input
pub struct StubSummarizer {
    reply: Option<String>,
    configured: bool,
    received: Mutex<Vec<String>>,
}

impl StubSummarizer {
    pub fn replying(summary: &str) -> Self {
        Self {
            reply: Some(summary.to_string()),
            configured: true,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Configured, but the completion carries no text
    pub fn empty() -> Self {
        Self {
            reply: None,
            configured: true,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            reply: None,
            configured: false,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn summarize(&self, content: &str) -> Result<String, SummarizeError> {
        if !self.configured {
            return Err(SummarizeError::MissingApiKey);
        }
        self.received.lock().unwrap().push(content.to_string());
        self.reply.clone().ok_or(SummarizeError::Extraction)
    }
}
