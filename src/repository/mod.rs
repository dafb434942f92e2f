mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Note, NoteFields, Session, User};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),

    /// A unique constraint rejected the write; carries the column name.
    #[error("unique constraint violated on {0}")]
    Conflict(&'static str),
}

/// Storage for users, their sessions and their notes.
///
/// Every note lookup is scoped by author: a note owned by someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    async fn get_user_by_username(&self, username: &str)
    -> Result<Option<User>, RepositoryError>;

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, RepositoryError>;

    async fn get_session(&self, token: Uuid) -> Result<Option<Session>, RepositoryError>;

    async fn delete_session(&self, token: Uuid) -> Result<bool, RepositoryError>;

    async fn create_note(&self, author_id: i64, fields: NoteFields)
    -> Result<Note, RepositoryError>;

    async fn update_note(
        &self,
        author_id: i64,
        slug: &str,
        fields: NoteFields,
    ) -> Result<Option<Note>, RepositoryError>;

    async fn delete_note(&self, author_id: i64, slug: &str) -> Result<bool, RepositoryError>;

    async fn get_note(&self, author_id: i64, slug: &str) -> Result<Option<Note>, RepositoryError>;

    async fn list_notes(&self, author_id: i64) -> Result<Vec<Note>, RepositoryError>;

    /// Checks the slug against every note, whoever owns it, skipping
    /// `exclude_id`.
    async fn slug_exists(
        &self,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, RepositoryError>;
}
