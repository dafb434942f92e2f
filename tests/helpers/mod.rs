use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use notes_server::{
    handlers::{self, AppState},
    models::{Note, NoteFields, User},
    repository::{MemoryRepository, Repository},
    service::{NoteService, UserService},
    slug::slugify,
};
use tower::ServiceExt;

use std::{sync::Arc, time::Duration};

pub const NOTE_TITLE: &str = "Название заметки";
pub const NOTE_TEXT: &str = "Текст заметки";

/// A full application over in-memory storage.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryRepository>,
    pub state: AppState,
}

/// A logged-in user together with the cookie that identifies their session.
#[allow(dead_code)]
pub struct Client {
    pub user: User,
    pub cookie: String,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let state = AppState {
            notes: Arc::new(NoteService::new(repo.clone())),
            users: Arc::new(UserService::new(
                repo.clone(),
                Duration::from_secs(60 * 60),
            )),
            secure_cookies: false,
        };

        Self {
            router: handlers::router(state.clone()),
            repo,
            state,
        }
    }

    /// Creates a user and logs them in without going through the login form.
    pub async fn login_as(&self, username: &str) -> Client {
        let user = self
            .repo
            .create_user(username, "!unusable")
            .await
            .expect("failed to create user");
        let session = self
            .state
            .users
            .start_session(&user)
            .await
            .expect("failed to start session");

        Client {
            user,
            cookie: format!("sessionid={}", session.token),
        }
    }

    /// Stores a note directly; a blank slug is derived from the title.
    pub async fn create_note(&self, author: &User, title: &str, text: &str, slug: &str) -> Note {
        let slug = if slug.is_empty() {
            slugify(title)
        } else {
            slug.to_string()
        };
        self.repo
            .create_note(
                author.id,
                NoteFields {
                    title: title.to_string(),
                    text: text.to_string(),
                    slug,
                },
            )
            .await
            .expect("failed to create note")
    }

    pub async fn note_count(&self) -> usize {
        self.repo.note_count().await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, client: Option<&Client>) -> Response<Body> {
        self.send(build(uri, "GET", client, Body::empty(), None)).await
    }

    pub async fn delete(&self, uri: &str, client: Option<&Client>) -> Response<Body> {
        self.send(build(uri, "DELETE", client, Body::empty(), None)).await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        client: Option<&Client>,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        self.send(build(
            uri,
            "POST",
            client,
            Body::from(encode_form(fields)),
            Some("application/x-www-form-urlencoded"),
        ))
        .await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        client: Option<&Client>,
        json: &serde_json::Value,
    ) -> Response<Body> {
        self.send(build(
            uri,
            method,
            client,
            Body::from(json.to_string()),
            Some("application/json"),
        ))
        .await
    }
}

fn build(
    uri: &str,
    method: &str,
    client: Option<&Client>,
    body: Body,
    content_type: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(client) = client {
        builder = builder.header(header::COOKIE, &client.cookie);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(body).expect("failed to build request")
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).expect("failed to encode form")
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is not utf-8")
}

#[allow(dead_code)]
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Asserts a 302 to `target`.
#[allow(dead_code)]
pub fn assert_redirects(response: &Response<Body>, target: &str) {
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(response), target);
}
