//! Server-rendered HTML. Every user-provided value goes through
//! [`text`] or [`attr`] before landing in markup.

use axum::response::Html;
use html_escape::{encode_double_quoted_attribute, encode_text};

use std::fmt::Write;

use crate::{
    forms::{FormErrors, NON_FIELD, NoteForm},
    handlers::urls,
    models::{Note, User},
};

fn text(value: &str) -> std::borrow::Cow<'_, str> {
    encode_text(value)
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    encode_double_quoted_attribute(value)
}

fn layout(title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let nav = match user {
        Some(user) => format!(
            r#"<span class="user">{}</span>
      <a href="{}">My notes</a>
      <a href="{}">Add note</a>
      <form method="post" action="{}" class="logout"><button type="submit">Log out</button></form>"#,
            text(&user.username),
            urls::LIST,
            urls::ADD,
            urls::LOGOUT,
        ),
        None => format!(
            r#"<a href="{}">Log in</a>
      <a href="{}">Sign up</a>"#,
            urls::LOGIN,
            urls::SIGNUP,
        ),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{} | Notes</title>
  </head>
  <body>
    <nav>
      <a href="{}">Home</a>
      {nav}
    </nav>
    <main>
{body}
    </main>
  </body>
</html>
"#,
        text(title),
        urls::HOME,
    ))
}

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<ul class="errorlist">"#);
    for message in errors {
        let _ = write!(out, "<li>{}</li>", text(message));
    }
    out.push_str("</ul>");
    out
}

fn input(label: &str, name: &str, kind: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<p>
  <label for="id_{name}">{label}</label>
  <input type="{kind}" name="{name}" id="id_{name}" value="{}">
  {}
</p>"#,
        attr(value),
        error_list(errors.field(name)),
    )
}

pub fn home(user: Option<&User>) -> Html<String> {
    let body = match user {
        Some(user) => format!(
            r#"<h1>Notes</h1>
<p>Welcome back, {}. Open <a href="{}">your notes</a> or <a href="{}">write a new one</a>.</p>"#,
            text(&user.username),
            urls::LIST,
            urls::ADD,
        ),
        None => format!(
            r#"<h1>Notes</h1>
<p>Keep personal notes. <a href="{}">Log in</a> or <a href="{}">sign up</a> to start.</p>"#,
            urls::LOGIN,
            urls::SIGNUP,
        ),
    };
    layout("Home", user, &body)
}

pub fn note_list(user: &User, notes: &[Note]) -> Html<String> {
    let mut body = String::from("<h1>My notes</h1>\n");
    if notes.is_empty() {
        body.push_str("<p>No notes yet.</p>");
    } else {
        body.push_str(r#"<ul class="notes">"#);
        for note in notes {
            let _ = write!(
                body,
                r#"<li><a href="{}">{}</a></li>"#,
                attr(&urls::detail(&note.slug)),
                text(&note.title),
            );
        }
        body.push_str("</ul>");
    }
    layout("My notes", Some(user), &body)
}

pub fn note_detail(user: &User, note: &Note) -> Html<String> {
    let body = format!(
        r#"<article class="note" data-slug="{}">
  <h1>{}</h1>
  <p>{}</p>
  <a href="{}">Edit</a>
  <a href="{}">Delete</a>
</article>"#,
        attr(&note.slug),
        text(&note.title),
        text(&note.text),
        attr(&urls::edit(&note.slug)),
        attr(&urls::delete(&note.slug)),
    );
    layout(&note.title, Some(user), &body)
}

pub fn note_form(
    user: &User,
    heading: &str,
    action: &str,
    form: &NoteForm,
    errors: &FormErrors,
) -> Html<String> {
    let body = format!(
        r#"<h1>{}</h1>
<form method="post" action="{}" class="note-form">
{}
{}
<p>
  <label for="id_text">Text</label>
  <textarea name="text" id="id_text">{}</textarea>
  {}
</p>
{}
<button type="submit">Save</button>
</form>"#,
        text(heading),
        attr(action),
        error_list(errors.field(NON_FIELD)),
        input("Title", "title", "text", &form.title, errors),
        text(&form.text),
        error_list(errors.field("text")),
        input("Slug", "slug", "text", &form.slug, errors),
    );
    layout(heading, Some(user), &body)
}

pub fn note_delete(user: &User, note: &Note) -> Html<String> {
    let body = format!(
        r#"<h1>Delete note</h1>
<p>Delete &laquo;{}&raquo;? This cannot be undone.</p>
<form method="post" action="{}">
  <button type="submit">Delete</button>
</form>"#,
        text(&note.title),
        attr(&urls::delete(&note.slug)),
    );
    layout("Delete note", Some(user), &body)
}

pub fn success(user: &User) -> Html<String> {
    let body = format!(
        r#"<h1>Done</h1>
<p>Your changes were saved. Back to <a href="{}">your notes</a>.</p>"#,
        urls::LIST,
    );
    layout("Done", Some(user), &body)
}

pub fn login(username: &str, next: Option<&str>, errors: &FormErrors) -> Html<String> {
    let next = next
        .map(|next| format!(r#"<input type="hidden" name="next" value="{}">"#, attr(next)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Log in</h1>
<form method="post" action="{}" class="login-form">
{}
{}
{}
{next}
<button type="submit">Log in</button>
</form>"#,
        urls::LOGIN,
        error_list(errors.field(NON_FIELD)),
        input("Username", "username", "text", username, errors),
        input("Password", "password", "password", "", errors),
    );
    layout("Log in", None, &body)
}

pub fn logged_out() -> Html<String> {
    let body = format!(
        r#"<h1>Logged out</h1>
<p>You have been logged out. <a href="{}">Log in again</a>.</p>"#,
        urls::LOGIN,
    );
    layout("Logged out", None, &body)
}

pub fn signup(username: &str, errors: &FormErrors) -> Html<String> {
    let body = format!(
        r#"<h1>Sign up</h1>
<form method="post" action="{}" class="signup-form">
{}
{}
{}
{}
<button type="submit">Sign up</button>
</form>"#,
        urls::SIGNUP,
        input("Username", "username", "text", username, errors),
        input("Password", "password1", "password", "", errors),
        input("Password confirmation", "password2", "password", "", errors),
        error_list(errors.field(NON_FIELD)),
    );
    layout("Sign up", None, &body)
}

pub fn not_found(user: Option<&User>) -> Html<String> {
    layout(
        "Not found",
        user,
        "<h1>Not found</h1>\n<p>The requested page does not exist.</p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(username: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escapes_user_content() {
        let now = Utc::now();
        let note = Note {
            id: 1,
            title: "<script>alert(1)</script>".to_string(),
            text: "a & b".to_string(),
            slug: "xss".to_string(),
            author_id: 1,
            created_at: now,
            updated_at: now,
        };

        let Html(page) = note_detail(&user("<b>me</b>"), &note);

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("a &amp; b"));
        assert!(!page.contains("<b>me</b>"));
    }

    #[test]
    fn form_shows_values_and_field_errors() {
        let form = NoteForm {
            title: "Title \"quoted\"".to_string(),
            text: "Body".to_string(),
            slug: "taken".to_string(),
        };
        let mut errors = FormErrors::default();
        errors.add("slug", "taken - duplicate");

        let Html(page) = note_form(&user("me"), "Edit note", "/edit/taken/", &form, &errors);

        assert!(page.contains(r#"name="title""#));
        assert!(page.contains("Title &quot;quoted&quot;"));
        assert!(page.contains(r#"<ul class="errorlist"><li>taken - duplicate</li></ul>"#));
    }
}
