//! HTML pages for notes. Every note page requires a login and only ever
//! looks up notes of the current user, so foreign notes answer 404.

pub mod templates;
pub mod users;

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use super::{AppState, found, session::CurrentUser, session::MaybeUser, urls};
use crate::{forms::FormErrors, forms::NoteForm, service::ServiceError};

fn not_found(user: Option<&crate::models::User>) -> Response {
    (StatusCode::NOT_FOUND, templates::not_found(user)).into_response()
}

fn internal_error(context: &str, e: &ServiceError) -> Response {
    tracing::error!("failed to {}: {}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

#[debug_handler(state = AppState)]
pub async fn home(MaybeUser(user): MaybeUser) -> Response {
    templates::home(user.as_ref()).into_response()
}

#[debug_handler(state = AppState)]
pub async fn list(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Response {
    match state.notes.list_notes(user.id).await {
        Ok(notes) => templates::note_list(&user, &notes).into_response(),
        Err(e) => internal_error("list notes", &e),
    }
}

#[debug_handler(state = AppState)]
pub async fn detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Response {
    match state.notes.get_note(user.id, &slug).await {
        Ok(note) => templates::note_detail(&user, &note).into_response(),
        Err(ServiceError::NotFound) => not_found(Some(&user)),
        Err(e) => internal_error("get note", &e),
    }
}

#[debug_handler(state = AppState)]
pub async fn add_form(CurrentUser(user): CurrentUser) -> Response {
    templates::note_form(
        &user,
        "Add note",
        urls::ADD,
        &NoteForm::default(),
        &FormErrors::default(),
    )
    .into_response()
}

#[debug_handler(state = AppState)]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NoteForm>,
) -> Response {
    match state.notes.create_note(user.id, &form).await {
        Ok(_) => found(urls::SUCCESS),
        Err(ServiceError::Validation(errors)) => {
            templates::note_form(&user, "Add note", urls::ADD, &form, &errors).into_response()
        }
        Err(e) => internal_error("create note", &e),
    }
}

#[debug_handler(state = AppState)]
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Response {
    match state.notes.get_note(user.id, &slug).await {
        Ok(note) => {
            let form = NoteForm {
                title: note.title,
                text: note.text,
                slug: note.slug,
            };
            templates::note_form(
                &user,
                "Edit note",
                &urls::edit(&slug),
                &form,
                &FormErrors::default(),
            )
            .into_response()
        }
        Err(ServiceError::NotFound) => not_found(Some(&user)),
        Err(e) => internal_error("get note", &e),
    }
}

#[debug_handler(state = AppState)]
pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    Form(form): Form<NoteForm>,
) -> Response {
    match state.notes.update_note(user.id, &slug, &form).await {
        Ok(_) => found(urls::SUCCESS),
        Err(ServiceError::Validation(errors)) => {
            templates::note_form(&user, "Edit note", &urls::edit(&slug), &form, &errors)
                .into_response()
        }
        Err(ServiceError::NotFound) => not_found(Some(&user)),
        Err(e) => internal_error("update note", &e),
    }
}

#[debug_handler(state = AppState)]
pub async fn delete_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Response {
    match state.notes.get_note(user.id, &slug).await {
        Ok(note) => templates::note_delete(&user, &note).into_response(),
        Err(ServiceError::NotFound) => not_found(Some(&user)),
        Err(e) => internal_error("get note", &e),
    }
}

#[debug_handler(state = AppState)]
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Response {
    match state.notes.delete_note(user.id, &slug).await {
        Ok(()) => found(urls::SUCCESS),
        Err(ServiceError::NotFound) => not_found(Some(&user)),
        Err(e) => internal_error("delete note", &e),
    }
}

#[debug_handler(state = AppState)]
pub async fn success(CurrentUser(user): CurrentUser) -> Response {
    templates::success(&user).into_response()
}

pub async fn fallback(MaybeUser(user): MaybeUser) -> Response {
    not_found(user.as_ref())
}
