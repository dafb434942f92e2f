use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use crate::{
    dto::{NoteRequest, NoteResponse, ValidationErrorResponse},
    forms::{FormErrors, NoteForm},
    handlers::{AppState, session::ApiUser},
    service::ServiceError,
};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, update_note, delete_note, get_one_note, get_all_notes),
    components(schemas(NoteResponse, NoteRequest, ValidationErrorResponse)),
    tags(
        (name = "notes", description = "Personal notes of the logged-in user")
    )
)]
pub struct ApiDoc;

fn validation_failed(errors: FormErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationErrorResponse {
            errors: errors.into_inner(),
        }),
    )
        .into_response()
}

#[debug_handler]
pub async fn openapi() -> Response {
    Json(ApiDoc::openapi()).into_response()
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Invalid note", body = ValidationErrorResponse),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn create_note(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Json(payload): Json<NoteRequest>,
) -> Response {
    match state.notes.create_note(user.id, &NoteForm::from(payload)).await {
        Ok(note) => (StatusCode::CREATED, Json(NoteResponse::from(note))).into_response(),
        Err(ServiceError::Validation(errors)) => validation_failed(errors),
        Err(e) => {
            tracing::error!("failed to create note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create note").into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/notes/{slug}",
    params(
        ("slug" = String, Path, description = "Note slug")
    ),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Invalid note", body = ValidationErrorResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn update_note(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(slug): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> Response {
    match state.notes.update_note(user.id, &slug, &NoteForm::from(payload)).await {
        Ok(note) => (StatusCode::OK, Json(NoteResponse::from(note))).into_response(),
        Err(ServiceError::Validation(errors)) => validation_failed(errors),
        Err(ServiceError::NotFound) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(e) => {
            tracing::error!("failed to update note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update note").into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{slug}",
    params(
        ("slug" = String, Path, description = "Note slug")
    ),
    responses(
        (status = 204, description = "Note deleted successfully"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn delete_note(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(slug): Path<String>,
) -> Response {
    match state.notes.delete_note(user.id, &slug).await {
        Ok(()) => (StatusCode::NO_CONTENT).into_response(),
        Err(ServiceError::NotFound) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(e) => {
            tracing::error!("failed to delete note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete note").into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/{slug}",
    params(
        ("slug" = String, Path, description = "Note slug")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn get_one_note(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(slug): Path<String>,
) -> Response {
    match state.notes.get_note(user.id, &slug).await {
        Ok(note) => (StatusCode::OK, Json(NoteResponse::from(note))).into_response(),
        Err(ServiceError::NotFound) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(e) => {
            tracing::error!("failed to get note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get note").into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "Notes of the current user", body = Vec<NoteResponse>),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn get_all_notes(State(state): State<AppState>, ApiUser(user): ApiUser) -> Response {
    match state.notes.list_notes(user.id).await {
        Ok(notes) => {
            let notes: Vec<NoteResponse> = notes.into_iter().map(NoteResponse::from).collect();
            (StatusCode::OK, Json(notes)).into_response()
        }
        Err(e) => {
            tracing::error!("failed to get note entries: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get all notes").into_response()
        }
    }
}
