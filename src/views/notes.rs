use std::fmt::Write;

use crate::client::{ListStatus, NotesState};
use crate::data::{Note, User};

use super::{escape_html, format_date, layout};

fn ui_button(action: &str, id: Option<&str>, label: &str, class: &str, disabled: bool) -> String {
    let id_field = id
        .map(|id| format!(r#"<input type="hidden" name="id" value="{}">"#, id))
        .unwrap_or_default();
    format!(
        r#"<form method="POST" action="/ui" class="inline"><input type="hidden" name="action" value="{action}">{id_field}<button type="submit" class="{class}"{disabled}>{label}</button></form>"#,
        disabled = if disabled { " disabled" } else { "" },
    )
}

fn note_card(note: &Note, state: &NotesState) -> String {
    let id = note.id.to_string();
    let summarizing = state.is_summarizing(note.id);
    let deleting = state.is_deleting(note.id);

    let summarize = format!(
        r#"<form method="POST" action="/notes/{id}/summarize" class="inline"><button type="submit" class="secondary"{disabled}>{label}</button></form>"#,
        disabled = if summarizing { " disabled" } else { "" },
        label = if summarizing { "Summarizing..." } else { "Summarize" },
    );

    format!(
        r#"<article class="card note" id="note-{id}">
    <header>
        <h2>{title}</h2>
        <time datetime="{iso}">{date}</time>
    </header>
    <p class="content">{content}</p>
    <footer class="actions">
        {edit}
        {summarize}
        {delete}
    </footer>
</article>"#,
        title = escape_html(&note.title),
        iso = note.created_at.to_rfc3339(),
        date = format_date(&note.created_at),
        content = escape_html(&note.content),
        edit = ui_button("open_edit", Some(&id), "Edit", "secondary", state.is_updating(note.id)),
        delete = ui_button("open_delete", Some(&id), "Delete", "danger", deleting),
    )
}

fn note_list(state: &NotesState) -> String {
    match &state.list {
        ListStatus::Failed(message) => {
            format!(r#"<div class="panel error">{}</div>"#, escape_html(message))
        }
        ListStatus::Idle | ListStatus::Loading => r#"<div class="panel muted">Loading notes...</div>"#.to_string(),
        ListStatus::Loaded if state.notes.is_empty() => r#"<div class="panel empty">
    <h2>No notes yet</h2>
    <p class="muted">Create your first note to get started.</p>
</div>"#
            .to_string(),
        ListStatus::Loaded => {
            let cards: Vec<String> = state.notes.iter().map(|n| note_card(n, state)).collect();
            format!(r#"<section class="grid">{}</section>"#, cards.join("\n"))
        }
    }
}

fn inline_error(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="message error">{}</p>"#, escape_html(e)))
        .unwrap_or_default()
}

fn dialog(title: &str, body: &str) -> String {
    format!(
        r#"<div class="overlay"><div class="dialog" role="dialog" aria-modal="true">
    <h2>{}</h2>
    {}
</div></div>"#,
        escape_html(title),
        body
    )
}

fn create_dialog(state: &NotesState) -> Option<String> {
    let d = &state.create;
    if !d.open {
        return None;
    }
    let body = format!(
        r#"<form method="POST" action="/notes">
        <label for="create-title">Title</label>
        <input id="create-title" name="title" value="{title}">
        <label for="create-content">Content</label>
        <textarea id="create-content" name="content" rows="6">{content}</textarea>
        {error}
        <div class="actions">
            <button type="submit" class="primary"{disabled}>{label}</button>
        </div>
    </form>
    {cancel}"#,
        title = escape_html(&d.title),
        content = escape_html(&d.content),
        error = inline_error(d.error.as_deref()),
        disabled = if state.is_creating() { " disabled" } else { "" },
        label = if state.is_creating() { "Saving..." } else { "Save Note" },
        cancel = ui_button("close_create", None, "Cancel", "link", false),
    );
    Some(dialog("Create New Note", &body))
}

fn edit_dialog(state: &NotesState) -> Option<String> {
    let d = &state.edit;
    let target = d.target.filter(|_| d.open)?;
    let updating = state.is_updating(target);
    let body = format!(
        r#"<form method="POST" action="/notes/{target}">
        <label for="edit-title">Title</label>
        <input id="edit-title" name="title" value="{title}">
        <label for="edit-content">Content</label>
        <textarea id="edit-content" name="content" rows="6">{content}</textarea>
        {error}
        <div class="actions">
            <button type="submit" class="primary"{disabled}>{label}</button>
        </div>
    </form>
    {cancel}"#,
        title = escape_html(&d.title),
        content = escape_html(&d.content),
        error = inline_error(d.error.as_deref()),
        disabled = if updating { " disabled" } else { "" },
        label = if updating { "Saving..." } else { "Save Changes" },
        cancel = ui_button("close_edit", None, "Cancel", "link", false),
    );
    Some(dialog("Edit Note", &body))
}

fn delete_dialog(state: &NotesState) -> Option<String> {
    let d = &state.delete;
    let target = d.target.filter(|_| d.open)?;
    let deleting = state.is_deleting(target);
    let body = format!(
        r#"<p>This action cannot be undone. This will permanently delete the note.</p>
    {error}
    <div class="actions">
        {cancel}
        <form method="POST" action="/notes/{target}/delete" class="inline"><button type="submit" class="danger"{disabled}>{label}</button></form>
    </div>"#,
        error = inline_error(d.error.as_deref()),
        cancel = ui_button("close_delete", None, "Cancel", "link", deleting),
        disabled = if deleting { " disabled" } else { "" },
        label = if deleting { "Deleting..." } else { "Delete" },
    );
    Some(dialog("Are you sure?", &body))
}

fn summary_dialog(state: &NotesState) -> Option<String> {
    let d = &state.summary;
    if !d.open {
        return None;
    }
    let mut body = String::new();
    if let Some(summary) = d.summary.as_deref() {
        let _ = write!(body, r#"<p class="summary">{}</p>"#, escape_html(summary));
    }
    body.push_str(&inline_error(d.error.as_deref()));
    body.push_str(&ui_button("close_summary", None, "Close", "primary", false));
    Some(dialog("Note Summary", &body))
}

/// Full notes page for `user` from one snapshot
pub fn render_notes(state: &NotesState, user: &User) -> String {
    let email = user.email.as_deref().unwrap_or("");
    let dialogs: String = [
        create_dialog(state),
        edit_dialog(state),
        delete_dialog(state),
        summary_dialog(state),
    ]
    .into_iter()
    .flatten()
    .collect();

    let body = format!(
        r#"<header class="topbar">
    <span class="brand">AI Notes</span>
    <span class="spacer"></span>
    <span class="muted">{email}</span>
    <form method="POST" action="/logout" class="inline"><button type="submit" class="link">Sign Out</button></form>
</header>
<main class="container">
    <div class="toolbar">
        <h1>My Notes</h1>
        {new_note}
    </div>
    {list}
</main>
{dialogs}"#,
        email = escape_html(email),
        new_note = ui_button("open_create", None, "New Note", "primary", state.is_creating()),
        list = note_list(state),
    );

    layout("AI Notes", &body)
}
