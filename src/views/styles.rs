//! Stylesheet for every page.

pub const APP_CSS: &str = r#"
:root {
    --bg: #f8fafc;
    --fg: #0f172a;
    --muted: #64748b;
    --card: #ffffff;
    --border: #e2e8f0;
    --primary: #4f46e5;
    --primary-fg: #ffffff;
    --danger: #dc2626;
    --success: #16a34a;
    --radius: 10px;
}

* { box-sizing: border-box; }

body {
    margin: 0;
    font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
    background: linear-gradient(135deg, rgba(79, 70, 229, 0.05), var(--bg) 40%);
    color: var(--fg);
    min-height: 100vh;
}

.topbar {
    display: flex;
    align-items: center;
    gap: 1rem;
    padding: 0.75rem 1.5rem;
    border-bottom: 1px solid var(--border);
    background: var(--card);
}

.brand { font-weight: 700; color: var(--primary); }
.spacer { flex: 1; }
.muted { color: var(--muted); }

.container { max-width: 1100px; margin: 0 auto; padding: 1.5rem; }

.toolbar {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 1.25rem;
}

.grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
    gap: 1rem;
}

.card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: var(--radius);
    padding: 1rem 1.25rem;
    box-shadow: 0 1px 2px rgba(15, 23, 42, 0.05);
}

.note header h2 { margin: 0 0 0.25rem; font-size: 1.1rem; }
.note time { font-size: 0.8rem; color: var(--muted); }
.note .content { white-space: pre-wrap; word-break: break-word; }
.actions { display: flex; gap: 0.5rem; justify-content: flex-end; flex-wrap: wrap; }

.panel {
    padding: 2rem;
    text-align: center;
    border: 1px dashed var(--border);
    border-radius: var(--radius);
    background: var(--card);
}
.panel.error { border-color: var(--danger); color: var(--danger); }

form.inline { display: inline; }

label { display: block; font-size: 0.9rem; margin: 0.75rem 0 0.25rem; }

input, textarea {
    width: 100%;
    padding: 0.5rem 0.65rem;
    border: 1px solid var(--border);
    border-radius: 6px;
    font: inherit;
}

button {
    font: inherit;
    padding: 0.45rem 0.9rem;
    border-radius: 6px;
    border: 1px solid var(--border);
    background: var(--card);
    cursor: pointer;
}
button[disabled] { opacity: 0.55; cursor: not-allowed; }
button.primary { background: var(--primary); color: var(--primary-fg); border-color: var(--primary); }
button.danger { background: var(--danger); color: #fff; border-color: var(--danger); }
button.link { background: none; border: none; color: var(--primary); text-decoration: underline; }
button.wide { width: 100%; margin-top: 1rem; }

.message { font-size: 0.9rem; margin: 0.5rem 0; }
.message.error { color: var(--danger); }
.message.success { color: var(--success); }

.overlay {
    position: fixed;
    inset: 0;
    background: rgba(15, 23, 42, 0.45);
    display: flex;
    align-items: center;
    justify-content: center;
}

.dialog {
    width: min(520px, 92vw);
    background: var(--card);
    border-radius: var(--radius);
    padding: 1.25rem 1.5rem;
}
.dialog h2 { margin-top: 0; }
.summary { white-space: pre-wrap; }

.auth-page { display: flex; align-items: center; justify-content: center; min-height: 100vh; }
.auth-card { width: 100%; max-width: 380px; }
a.link { display: block; text-align: center; margin-top: 1rem; color: var(--primary); }
"#;
