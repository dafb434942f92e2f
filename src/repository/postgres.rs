mod embedded {
    refinery::embed_migrations!("migrations");
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::{Client, NoTls, Row, error::SqlState};
use uuid::Uuid;

use embedded::migrations;

use super::{Repository, RepositoryError};
use crate::models::{Note, NoteFields, Session, User};

const NOTE_COLUMNS: &str = "id, title, text, slug, author_id, created_at, updated_at";

pub struct PgRepository {
    client: Client,
}

impl PgRepository {
    pub async fn new(database_dsn: &str) -> Result<Self, RepositoryError> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), RepositoryError> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        text: row.get("text"),
        slug: row.get("slug"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

fn session_from_row(row: &Row) -> Session {
    Session {
        token: row.get("token"),
        user_id: row.get("user_id"),
        expires_at: row.get("expires_at"),
    }
}

/// Maps a unique violation to [`RepositoryError::Conflict`] on `column`.
fn conflict_on(column: &'static str) -> impl FnOnce(tokio_postgres::Error) -> RepositoryError {
    move |e| {
        if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
            RepositoryError::Conflict(column)
        } else {
            RepositoryError::Database(e)
        }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
                 RETURNING id, username, password_hash, created_at",
                &[&username, &password_hash],
            )
            .await
            .map_err(conflict_on("username"))?;

        Ok(user_from_row(&row))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
                &[&username],
            )
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, RepositoryError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3) \
                 RETURNING token, user_id, expires_at",
                &[&Uuid::new_v4(), &user_id, &expires_at],
            )
            .await?;

        Ok(session_from_row(&row))
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<Session>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                "SELECT token, user_id, expires_at FROM sessions WHERE token = $1",
                &[&token],
            )
            .await?;

        Ok(row.as_ref().map(session_from_row))
    }

    async fn delete_session(&self, token: Uuid) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute("DELETE FROM sessions WHERE token = $1", &[&token])
            .await?;

        Ok(rows == 1)
    }

    async fn create_note(
        &self,
        author_id: i64,
        fields: NoteFields,
    ) -> Result<Note, RepositoryError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notes (title, text, slug, author_id) VALUES ($1, $2, $3, $4) \
                     RETURNING {NOTE_COLUMNS}"
                ),
                &[&fields.title, &fields.text, &fields.slug, &author_id],
            )
            .await
            .map_err(conflict_on("slug"))?;

        Ok(note_from_row(&row))
    }

    async fn update_note(
        &self,
        author_id: i64,
        slug: &str,
        fields: NoteFields,
    ) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notes SET title = $1, text = $2, slug = $3, updated_at = NOW() \
                     WHERE slug = $4 AND author_id = $5 RETURNING {NOTE_COLUMNS}"
                ),
                &[&fields.title, &fields.text, &fields.slug, &slug, &author_id],
            )
            .await
            .map_err(conflict_on("slug"))?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_note(&self, author_id: i64, slug: &str) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "DELETE FROM notes WHERE slug = $1 AND author_id = $2",
                &[&slug, &author_id],
            )
            .await?;

        Ok(rows == 1)
    }

    async fn get_note(&self, author_id: i64, slug: &str) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE slug = $1 AND author_id = $2"),
                &[&slug, &author_id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn list_notes(&self, author_id: i64) -> Result<Vec<Note>, RepositoryError> {
        let rows = self
            .client
            .query(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE author_id = $1 ORDER BY id"),
                &[&author_id],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn slug_exists(
        &self,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        let row = self
            .client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM notes WHERE slug = $1 \
                 AND ($2::BIGINT IS NULL OR id <> $2))",
                &[&slug, &exclude_id],
            )
            .await?;

        Ok(row.get(0))
    }
}
