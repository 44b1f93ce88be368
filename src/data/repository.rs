use async_trait::async_trait;
use uuid::Uuid;

use super::error::DataServiceError;
use super::models::{Credentials, NewNote, Note, NoteChanges, Session, User};

/// Row operations on the `notes` relation.
///
/// Every call runs with the caller's access token so the data service can
/// enforce ownership; this crate never filters by owner itself.
#[async_trait]
pub trait NotesRepository: Send + Sync {
    /// All notes visible to the session, newest first
    async fn list_notes(&self, access_token: &str) -> Result<Vec<Note>, DataServiceError>;

    async fn create_note(&self, access_token: &str, note: &NewNote) -> Result<Note, DataServiceError>;

    async fn update_note(
        &self,
        access_token: &str,
        id: Uuid,
        changes: &NoteChanges,
    ) -> Result<Note, DataServiceError>;

    async fn delete_note(&self, access_token: &str, id: Uuid) -> Result<(), DataServiceError>;
}

/// Identity operations of the data service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), DataServiceError>;

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, DataServiceError>;

    /// Exchange a refresh token for a new token pair
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, DataServiceError>;

    async fn get_user(&self, access_token: &str) -> Result<User, DataServiceError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), DataServiceError>;
}
