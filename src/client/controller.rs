use std::sync::Arc;

use uuid::Uuid;

use crate::data::{CurrentSession, NewNote, NoteChanges, NotesRepository};
use crate::summarize::Summarizer;

use super::state::{Action, ListStatus, NotesState};
use super::store::Store;

pub const EMPTY_FIELDS_MESSAGE: &str = "Title and content cannot be empty.";
pub const LIST_FAILED_MESSAGE: &str = "Failed to fetch notes. Please try again.";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create note. Please try again.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update note.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete note. Please try again.";
pub const SUMMARY_FAILED_MESSAGE: &str = "Failed to get summary.";
pub const NOTE_GONE_MESSAGE: &str = "This note no longer exists.";

/// Drives the notes page for one signed-in browser session.
///
/// Every outcome is dispatched to the session's `Store`; callers re-render
/// from `snapshot()` afterwards. Collaborator calls are made with the
/// session's access token.
pub struct NotesClient {
    store: Arc<Store>,
    notes: Arc<dyn NotesRepository>,
    summarizer: Arc<dyn Summarizer>,
    session: CurrentSession,
}

impl NotesClient {
    pub fn new(
        store: Arc<Store>,
        notes: Arc<dyn NotesRepository>,
        summarizer: Arc<dyn Summarizer>,
        session: CurrentSession,
    ) -> Self {
        Self {
            store,
            notes,
            summarizer,
            session,
        }
    }

    pub fn snapshot(&self) -> Arc<NotesState> {
        self.store.snapshot()
    }

    pub fn session(&self) -> &CurrentSession {
        &self.session
    }

    fn token(&self) -> &str {
        &self.session.access_token
    }

    pub async fn load(&self) {
        self.store.dispatch(Action::ListRequested);

        match self.notes.list_notes(self.token()).await {
            Ok(notes) => {
                tracing::info!(user = %self.session.user.id, count = notes.len(), "Loaded notes");
                self.store.dispatch(Action::ListLoaded(notes));
            }
            Err(e) => {
                tracing::warn!(user = %self.session.user.id, "Failed to fetch notes: {}", e);
                self.store.dispatch(Action::ListFailed(LIST_FAILED_MESSAGE.to_string()));
            }
        }
    }

    /// Fetch once per browser session; a failed fetch is retried on the
    /// next page load.
    pub async fn load_if_needed(&self) {
        if matches!(self.snapshot().list, ListStatus::Idle | ListStatus::Failed(_)) {
            self.load().await;
        }
    }

    pub fn open_create(&self) {
        self.store.dispatch(Action::OpenCreate);
    }

    pub fn close_create(&self) {
        self.store.dispatch(Action::CloseCreate);
    }

    pub async fn create(&self, title: &str, content: &str) {
        if self.snapshot().is_creating() {
            tracing::debug!("Create already in flight, dropping");
            return;
        }

        let (trimmed_title, trimmed_content) = (title.trim(), content.trim());
        if trimmed_title.is_empty() || trimmed_content.is_empty() {
            self.store.dispatch(Action::CreateRejected {
                title: title.to_string(),
                content: content.to_string(),
                message: EMPTY_FIELDS_MESSAGE.to_string(),
            });
            return;
        }

        self.store.dispatch(Action::CreateRequested {
            title: trimmed_title.to_string(),
            content: trimmed_content.to_string(),
        });

        let new_note = NewNote {
            title: trimmed_title.to_string(),
            content: trimmed_content.to_string(),
            user_id: self.session.user.id,
        };

        match self.notes.create_note(self.token(), &new_note).await {
            Ok(note) => {
                tracing::info!(note = %note.id, "Created note");
                self.store.dispatch(Action::CreateSucceeded(note));
            }
            Err(e) => {
                tracing::warn!("Failed to create note: {}", e);
                self.store
                    .dispatch(Action::CreateFailed(e.user_message(CREATE_FAILED_MESSAGE)));
            }
        }
    }

    pub fn open_edit(&self, id: Uuid) {
        self.store.dispatch(Action::OpenEdit(id));
    }

    pub fn close_edit(&self) {
        self.store.dispatch(Action::CloseEdit);
    }

    pub async fn update(&self, id: Uuid, title: &str, content: &str) {
        if self.snapshot().is_updating(id) {
            tracing::debug!(note = %id, "Update already in flight, dropping");
            return;
        }

        let (trimmed_title, trimmed_content) = (title.trim(), content.trim());
        if trimmed_title.is_empty() || trimmed_content.is_empty() {
            self.store.dispatch(Action::UpdateRejected {
                title: title.to_string(),
                content: content.to_string(),
                message: EMPTY_FIELDS_MESSAGE.to_string(),
            });
            return;
        }

        self.store.dispatch(Action::UpdateRequested {
            id,
            title: trimmed_title.to_string(),
            content: trimmed_content.to_string(),
        });

        let changes = NoteChanges {
            title: trimmed_title.to_string(),
            content: trimmed_content.to_string(),
        };

        match self.notes.update_note(self.token(), id, &changes).await {
            Ok(note) => {
                tracing::info!(note = %id, "Updated note");
                self.store.dispatch(Action::UpdateSucceeded(note));
            }
            Err(e) => {
                tracing::warn!(note = %id, "Failed to update note: {}", e);
                self.store.dispatch(Action::UpdateFailed {
                    id,
                    message: e.user_message(UPDATE_FAILED_MESSAGE),
                });
            }
        }
    }

    pub fn open_delete(&self, id: Uuid) {
        self.store.dispatch(Action::OpenDelete(id));
    }

    pub fn close_delete(&self) {
        self.store.dispatch(Action::CloseDelete);
    }

    pub async fn confirm_delete(&self, id: Uuid) {
        if self.snapshot().is_deleting(id) {
            tracing::debug!(note = %id, "Delete already in flight, dropping");
            return;
        }

        self.store.dispatch(Action::DeleteRequested(id));

        match self.notes.delete_note(self.token(), id).await {
            Ok(()) => {
                tracing::info!(note = %id, "Deleted note");
                self.store.dispatch(Action::DeleteSucceeded(id));
            }
            Err(e) => {
                tracing::warn!(note = %id, "Failed to delete note: {}", e);
                self.store.dispatch(Action::DeleteFailed {
                    id,
                    message: e.user_message(DELETE_FAILED_MESSAGE),
                });
            }
        }
    }

    pub async fn summarize(&self, id: Uuid) {
        let snapshot = self.snapshot();
        if snapshot.is_summarizing(id) {
            tracing::debug!(note = %id, "Summary already in flight, dropping");
            return;
        }

        let Some(content) = snapshot.find(id).map(|note| note.content.clone()) else {
            self.store.dispatch(Action::SummarizeFailed {
                id,
                message: NOTE_GONE_MESSAGE.to_string(),
            });
            return;
        };

        self.store.dispatch(Action::SummarizeRequested(id));

        match self.summarizer.summarize(&content).await {
            Ok(summary) => {
                self.store.dispatch(Action::SummarizeSucceeded { id, summary });
            }
            Err(e) => {
                tracing::warn!(note = %id, "Failed to summarize note: {}", e);
                let message = e.to_string();
                let message = if message.trim().is_empty() {
                    SUMMARY_FAILED_MESSAGE.to_string()
                } else {
                    message
                };
                self.store.dispatch(Action::SummarizeFailed { id, message });
            }
        }
    }

    pub fn close_summary(&self) {
        self.store.dispatch(Action::CloseSummary);
    }
}
