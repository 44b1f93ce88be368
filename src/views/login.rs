use crate::auth_form::{AuthForm, AuthMode};

use super::{escape_html, layout};

/// Login page. The password field is always rendered empty.
pub fn render_login(form: &AuthForm) -> String {
    let (heading, description, submit, toggle) = match form.mode {
        AuthMode::SignIn => (
            "Login",
            "Enter your email below to login to your account.",
            "Sign In",
            "Don't have an account? Sign Up",
        ),
        AuthMode::SignUp => (
            "Sign Up",
            "Enter your details to create an account.",
            "Sign Up",
            "Already have an account? Sign In",
        ),
    };

    let error = form
        .error
        .as_deref()
        .map(|e| format!(r#"<p class="message error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();
    let message = form
        .message
        .as_deref()
        .map(|m| format!(r#"<p class="message success">{}</p>"#, escape_html(m)))
        .unwrap_or_default();

    let body = format!(
        r#"<main class="auth-page">
    <section class="card auth-card">
        <h1>{heading}</h1>
        <p class="muted">{description}</p>
        <form method="POST" action="/login">
            <input type="hidden" name="mode" value="{mode}">
            <label for="email">Email</label>
            <input id="email" type="email" name="email" placeholder="m@example.com" value="{email}" required>
            <label for="password">Password</label>
            <input id="password" type="password" name="password" required>
            {error}
            {message}
            <button type="submit" class="primary wide">{submit}</button>
        </form>
        <a class="link" href="/login?mode={other}">{toggle}</a>
    </section>
</main>"#,
        mode = form.mode.as_str(),
        email = escape_html(&form.email),
        other = form.mode.toggled().as_str(),
    );

    layout(heading, &body)
}
