use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use serde::Deserialize;

use super::{internal_error, templates};
use crate::{
    forms::{FormErrors, LoginForm, SignupForm},
    handlers::{
        AppState, found,
        session::{expired_session_cookie, session_cookie, session_token},
        urls,
    },
    service::ServiceError,
};

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

#[debug_handler]
pub async fn login_form(Query(query): Query<NextQuery>) -> Response {
    templates::login("", query.next.as_deref(), &FormErrors::default()).into_response()
}

#[debug_handler]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.users.login(&form).await {
        Ok((_, session)) => {
            let target = form
                .next
                .as_deref()
                .filter(|next| urls::is_safe_redirect(next))
                .unwrap_or(urls::HOME);
            let mut response = found(target);
            response.headers_mut().insert(
                header::SET_COOKIE,
                session_cookie(
                    session.token,
                    state.users.session_ttl(),
                    state.secure_cookies,
                ),
            );
            response
        }
        Err(ServiceError::Validation(errors)) => {
            templates::login(&form.username, form.next.as_deref(), &errors).into_response()
        }
        Err(e) => internal_error("log in", &e),
    }
}

/// Ends the session, if there is one. Answers both GET and POST.
#[debug_handler]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.users.logout(token).await {
            return internal_error("log out", &e);
        }
    }

    (
        [(header::SET_COOKIE, expired_session_cookie())],
        templates::logged_out(),
    )
        .into_response()
}

#[debug_handler]
pub async fn signup_form() -> Response {
    templates::signup("", &FormErrors::default()).into_response()
}

#[debug_handler]
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    match state.users.register(&form).await {
        Ok(_) => found(urls::LOGIN),
        Err(ServiceError::Validation(errors)) => {
            templates::signup(&form.username, &errors).into_response()
        }
        Err(e) => internal_error("register user", &e),
    }
}
