use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::Utc;
use uuid::Uuid;

use std::{sync::Arc, time::Duration};

use super::ServiceError;
use crate::{
    forms::{FormErrors, LoginForm, NON_FIELD, SignupForm},
    models::{Session, User},
    repository::{Repository, RepositoryError},
};

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn Repository>,
    session_ttl: Duration,
}

impl UserService {
    pub fn new(repo: Arc<dyn Repository>, session_ttl: Duration) -> Self {
        Self { repo, session_ttl }
    }

    pub async fn register(&self, form: &SignupForm) -> Result<User, ServiceError> {
        let username = form.clean()?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(form.password1.as_bytes(), &salt)
            .map_err(ServiceError::PasswordHash)?
            .to_string();

        let user = match self.repo.create_user(&username, &password_hash).await {
            Ok(user) => user,
            Err(RepositoryError::Conflict(_)) => {
                let mut errors = FormErrors::default();
                errors.add("username", "A user with that username already exists.");
                return Err(errors.into());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!("registered user '{}' (id {})", user.username, user.id);
        Ok(user)
    }

    /// Checks the credentials and opens a new session.
    pub async fn login(&self, form: &LoginForm) -> Result<(User, Session), ServiceError> {
        let user = self
            .repo
            .get_user_by_username(form.username.trim())
            .await?
            .filter(|user| verify_password(user, &form.password));

        let Some(user) = user else {
            tracing::info!("failed login attempt for '{}'", form.username);
            let mut errors = FormErrors::default();
            errors.add(NON_FIELD, INVALID_LOGIN);
            return Err(errors.into());
        };

        let session = self.start_session(&user).await?;
        tracing::info!("user '{}' logged in", user.username);
        Ok((user, session))
    }

    pub async fn start_session(&self, user: &User) -> Result<Session, ServiceError> {
        let expires_at = chrono::Duration::from_std(self.session_ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or(ServiceError::SessionTtl(self.session_ttl))?;
        Ok(self.repo.create_session(user.id, expires_at).await?)
    }

    pub async fn logout(&self, token: Uuid) -> Result<(), ServiceError> {
        if self.repo.delete_session(token).await? {
            tracing::info!("session closed");
        }
        Ok(())
    }

    /// Resolves a session token to its user. Expired sessions are removed.
    pub async fn authenticate(&self, token: Uuid) -> Result<Option<User>, ServiceError> {
        let Some(session) = self.repo.get_session(token).await? else {
            return Ok(None);
        };

        if !session.is_valid() {
            self.repo.delete_session(token).await?;
            return Ok(None);
        }

        Ok(self.repo.get_user(session.user_id).await?)
    }

    pub const fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

/// Uses argon2 to verify the stored hash against the provided password.
fn verify_password(user: &User, password: &str) -> bool {
    let hash = match PasswordHash::new(&user.password_hash) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!("failed to parse password hash: {}", err);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}
