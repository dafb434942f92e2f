//! Session cookie handling and the user extractors built on it.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use std::time::Duration;

use super::{AppState, found, urls};
use crate::models::User;

pub const SESSION_COOKIE: &str = "sessionid";

/// Reads the session token from the `Cookie` headers, if any.
pub fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(token: Uuid, max_age: Duration, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    // uuid and integers only, always a valid header value
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("sessionid=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// The logged-in user, if the request carries a valid session.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(Self(None));
        };

        match state.users.authenticate(token).await {
            Ok(user) => Ok(Self(user)),
            Err(e) => {
                tracing::error!("failed to resolve session: {}", e);
                Err(
                    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to resolve session")
                        .into_response(),
                )
            }
        }
    }
}

/// Requires a login; anonymous requests are redirected to the login page
/// with `next` pointing back at the requested URL.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(Self(user)),
            MaybeUser(None) => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);
                Err(found(&urls::login_with_next(&next)))
            }
        }
    }
}

const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";

/// Like [`CurrentUser`], but answers anonymous requests with 401 JSON.
pub struct ApiUser(pub User);

impl FromRequestParts<AppState> for ApiUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(Self(user)),
            MaybeUser(None) => Err((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "detail": NOT_AUTHENTICATED })),
            )
                .into_response()),
        }
    }
}
