pub mod pages;
pub mod rest;
pub mod session;
pub mod urls;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::service::{NoteService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<NoteService>,
    pub users: Arc<UserService>,
    pub secure_cookies: bool,
}

/// 302 redirect to a local path.
pub fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!("invalid redirect location '{}': {}", location, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

pub fn router(state: AppState) -> Router {
    // HTML pages
    let pages_router = Router::new()
        .route(urls::HOME, get(pages::home))
        .route(urls::LIST, get(pages::list))
        .route(urls::DETAIL, get(pages::detail))
        .route(urls::ADD, get(pages::add_form).post(pages::add))
        .route(urls::EDIT, get(pages::edit_form).post(pages::edit))
        .route(
            urls::DELETE,
            get(pages::delete_form)
                .post(pages::delete)
                .delete(pages::delete),
        )
        .route(urls::SUCCESS, get(pages::success))
        .route(
            urls::LOGIN,
            get(pages::users::login_form).post(pages::users::login),
        )
        .route(
            urls::LOGOUT,
            get(pages::users::logout).post(pages::users::logout),
        )
        .route(
            urls::SIGNUP,
            get(pages::users::signup_form).post(pages::users::signup),
        );

    // JSON API
    let rest_router = Router::new()
        .route("/notes", get(rest::get_all_notes).post(rest::create_note))
        .route(
            "/notes/{slug}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .route("/openapi.json", get(rest::openapi));

    Router::new()
        .merge(pages_router)
        .nest("/api", rest_router)
        .fallback(pages::fallback)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
