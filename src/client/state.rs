//! Immutable snapshot of the notes page and the reducer that advances it.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::data::Note;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateDialog {
    pub open: bool,
    pub title: String,
    pub content: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditDialog {
    pub open: bool,
    pub target: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteDialog {
    pub open: bool,
    pub target: Option<Uuid>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryDialog {
    pub open: bool,
    pub target: Option<Uuid>,
    pub summary: Option<String>,
    pub error: Option<String>,
}

/// Outstanding mutations, keyed by the entity they act on
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pending {
    pub create: bool,
    pub update: BTreeSet<Uuid>,
    pub delete: BTreeSet<Uuid>,
    pub summarize: BTreeSet<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotesState {
    pub notes: Vec<Note>,
    pub list: ListStatus,
    pub create: CreateDialog,
    pub edit: EditDialog,
    pub delete: DeleteDialog,
    pub summary: SummaryDialog,
    pub pending: Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Create,
    Edit,
    Delete,
    Summary,
}

/// Part of a snapshot that differs from its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Notes,
    List,
    Dialog(DialogKind),
    Pending,
}

/// Every way the notes page state can change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListRequested,
    ListLoaded(Vec<Note>),
    ListFailed(String),

    OpenCreate,
    CloseCreate,
    CreateRequested { title: String, content: String },
    CreateRejected { title: String, content: String, message: String },
    CreateSucceeded(Note),
    CreateFailed(String),

    OpenEdit(Uuid),
    CloseEdit,
    UpdateRequested { id: Uuid, title: String, content: String },
    UpdateRejected { title: String, content: String, message: String },
    UpdateSucceeded(Note),
    UpdateFailed { id: Uuid, message: String },

    OpenDelete(Uuid),
    CloseDelete,
    DeleteRequested(Uuid),
    DeleteSucceeded(Uuid),
    DeleteFailed { id: Uuid, message: String },

    SummarizeRequested(Uuid),
    SummarizeSucceeded { id: Uuid, summary: String },
    SummarizeFailed { id: Uuid, message: String },
    CloseSummary,
}

impl Action {
    /// Stable name for logs; never includes note text
    pub fn name(&self) -> &'static str {
        match self {
            Action::ListRequested => "list_requested",
            Action::ListLoaded(_) => "list_loaded",
            Action::ListFailed(_) => "list_failed",
            Action::OpenCreate => "open_create",
            Action::CloseCreate => "close_create",
            Action::CreateRequested { .. } => "create_requested",
            Action::CreateRejected { .. } => "create_rejected",
            Action::CreateSucceeded(_) => "create_succeeded",
            Action::CreateFailed(_) => "create_failed",
            Action::OpenEdit(_) => "open_edit",
            Action::CloseEdit => "close_edit",
            Action::UpdateRequested { .. } => "update_requested",
            Action::UpdateRejected { .. } => "update_rejected",
            Action::UpdateSucceeded(_) => "update_succeeded",
            Action::UpdateFailed { .. } => "update_failed",
            Action::OpenDelete(_) => "open_delete",
            Action::CloseDelete => "close_delete",
            Action::DeleteRequested(_) => "delete_requested",
            Action::DeleteSucceeded(_) => "delete_succeeded",
            Action::DeleteFailed { .. } => "delete_failed",
            Action::SummarizeRequested(_) => "summarize_requested",
            Action::SummarizeSucceeded { .. } => "summarize_succeeded",
            Action::SummarizeFailed { .. } => "summarize_failed",
            Action::CloseSummary => "close_summary",
        }
    }
}

impl NotesState {
    pub fn find(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn is_creating(&self) -> bool {
        self.pending.create
    }

    pub fn is_updating(&self, id: Uuid) -> bool {
        self.pending.update.contains(&id)
    }

    pub fn is_deleting(&self, id: Uuid) -> bool {
        self.pending.delete.contains(&id)
    }

    pub fn is_summarizing(&self, id: Uuid) -> bool {
        self.pending.summarize.contains(&id)
    }

    /// Apply `action`, returning the next snapshot. `self` is left untouched.
    pub fn apply(&self, action: Action) -> NotesState {
        let mut next = self.clone();

        match action {
            Action::ListRequested => {
                next.list = ListStatus::Loading;
            }
            Action::ListLoaded(notes) => {
                next.notes = notes;
                next.list = ListStatus::Loaded;
            }
            Action::ListFailed(message) => {
                next.list = ListStatus::Failed(message);
            }

            Action::OpenCreate => {
                next.create.open = true;
                next.create.error = None;
            }
            Action::CloseCreate => {
                next.create.open = false;
            }
            Action::CreateRequested { title, content } => {
                next.create.title = title;
                next.create.content = content;
                next.create.error = None;
                next.pending.create = true;
            }
            Action::CreateRejected { title, content, message } => {
                next.create.title = title;
                next.create.content = content;
                next.create.error = Some(message);
            }
            Action::CreateSucceeded(note) => {
                next.notes.insert(0, note);
                next.create = CreateDialog::default();
                next.pending.create = false;
            }
            Action::CreateFailed(message) => {
                next.create.error = Some(message);
                next.pending.create = false;
            }

            Action::OpenEdit(id) => {
                if let Some(note) = self.find(id) {
                    next.edit = EditDialog {
                        open: true,
                        target: Some(id),
                        title: note.title.clone(),
                        content: note.content.clone(),
                        error: None,
                    };
                }
            }
            Action::CloseEdit => {
                next.edit.open = false;
            }
            Action::UpdateRequested { id, title, content } => {
                next.edit.title = title;
                next.edit.content = content;
                next.edit.error = None;
                next.pending.update.insert(id);
            }
            Action::UpdateRejected { title, content, message } => {
                next.edit.title = title;
                next.edit.content = content;
                next.edit.error = Some(message);
            }
            Action::UpdateSucceeded(note) => {
                next.pending.update.remove(&note.id);
                if next.edit.target == Some(note.id) {
                    next.edit.open = false;
                    next.edit.error = None;
                }
                if let Some(slot) = next.notes.iter_mut().find(|n| n.id == note.id) {
                    *slot = note;
                }
            }
            Action::UpdateFailed { id, message } => {
                next.pending.update.remove(&id);
                if next.edit.target == Some(id) {
                    next.edit.error = Some(message);
                }
            }

            Action::OpenDelete(id) => {
                next.delete = DeleteDialog {
                    open: true,
                    target: Some(id),
                    error: None,
                };
            }
            Action::CloseDelete => {
                next.delete = DeleteDialog::default();
            }
            Action::DeleteRequested(id) => {
                next.delete.error = None;
                next.pending.delete.insert(id);
            }
            Action::DeleteSucceeded(id) => {
                next.pending.delete.remove(&id);
                next.notes.retain(|note| note.id != id);
                if next.delete.target == Some(id) {
                    next.delete = DeleteDialog::default();
                }
                if next.edit.target == Some(id) {
                    next.edit = EditDialog::default();
                }
            }
            Action::DeleteFailed { id, message } => {
                next.pending.delete.remove(&id);
                if next.delete.target == Some(id) {
                    next.delete.error = Some(message);
                }
            }

            Action::SummarizeRequested(id) => {
                next.summary.summary = None;
                next.summary.error = None;
                next.pending.summarize.insert(id);
            }
            Action::SummarizeSucceeded { id, summary } => {
                next.pending.summarize.remove(&id);
                next.summary = SummaryDialog {
                    open: true,
                    target: Some(id),
                    summary: Some(summary),
                    error: None,
                };
            }
            Action::SummarizeFailed { id, message } => {
                next.pending.summarize.remove(&id);
                next.summary = SummaryDialog {
                    open: true,
                    target: Some(id),
                    summary: None,
                    error: Some(message),
                };
            }
            Action::CloseSummary => {
                if let Some(id) = next.summary.target {
                    next.pending.summarize.remove(&id);
                }
                next.summary = SummaryDialog::default();
            }
        }

        next
    }

    /// Parts of `self` that differ from `previous`, in render order
    pub fn changes_since(&self, previous: &NotesState) -> Vec<Change> {
        let mut changes = Vec::new();

        if self.notes != previous.notes {
            changes.push(Change::Notes);
        }
        if self.list != previous.list {
            changes.push(Change::List);
        }
        if self.create != previous.create {
            changes.push(Change::Dialog(DialogKind::Create));
        }
        if self.edit != previous.edit {
            changes.push(Change::Dialog(DialogKind::Edit));
        }
        if self.delete != previous.delete {
            changes.push(Change::Dialog(DialogKind::Delete));
        }
        if self.summary != previous.summary {
            changes.push(Change::Dialog(DialogKind::Summary));
        }
        if self.pending != previous.pending {
            changes.push(Change::Pending);
        }

        changes
    }
}
