use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Repository, RepositoryError};
use crate::models::{Note, NoteFields, Session, User};

#[derive(Default)]
struct Tables {
    next_user_id: i64,
    next_note_id: i64,
    users: Vec<User>,
    notes: Vec<Note>,
    sessions: HashMap<Uuid, Session>,
}

/// In-process storage with the same uniqueness rules as the Postgres schema.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes across all authors.
    pub async fn note_count(&self) -> usize {
        self.tables.read().await.notes.len()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(RepositoryError::Conflict("username"));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, RepositoryError> {
        let session = Session {
            token: Uuid::new_v4(),
            user_id,
            expires_at,
        };
        self.tables
            .write()
            .await
            .sessions
            .insert(session.token, session.clone());

        Ok(session)
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<Session>, RepositoryError> {
        Ok(self.tables.read().await.sessions.get(&token).cloned())
    }

    async fn delete_session(&self, token: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.sessions.remove(&token).is_some())
    }

    async fn create_note(
        &self,
        author_id: i64,
        fields: NoteFields,
    ) -> Result<Note, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.notes.iter().any(|n| n.slug == fields.slug) {
            return Err(RepositoryError::Conflict("slug"));
        }

        tables.next_note_id += 1;
        let now = Utc::now();
        let note = Note {
            id: tables.next_note_id,
            title: fields.title,
            text: fields.text,
            slug: fields.slug,
            author_id,
            created_at: now,
            updated_at: now,
        };
        tables.notes.push(note.clone());

        Ok(note)
    }

    async fn update_note(
        &self,
        author_id: i64,
        slug: &str,
        fields: NoteFields,
    ) -> Result<Option<Note>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(idx) = tables
            .notes
            .iter()
            .position(|n| n.slug == slug && n.author_id == author_id)
        else {
            return Ok(None);
        };

        let id = tables.notes[idx].id;
        if tables
            .notes
            .iter()
            .any(|n| n.slug == fields.slug && n.id != id)
        {
            return Err(RepositoryError::Conflict("slug"));
        }

        let note = &mut tables.notes[idx];
        note.title = fields.title;
        note.text = fields.text;
        note.slug = fields.slug;
        note.updated_at = Utc::now();

        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, author_id: i64, slug: &str) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.notes.len();
        tables
            .notes
            .retain(|n| !(n.slug == slug && n.author_id == author_id));

        Ok(tables.notes.len() < before)
    }

    async fn get_note(&self, author_id: i64, slug: &str) -> Result<Option<Note>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .find(|n| n.slug == slug && n.author_id == author_id)
            .cloned())
    }

    async fn list_notes(&self, author_id: i64) -> Result<Vec<Note>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .filter(|n| n.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn slug_exists(
        &self,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .any(|n| n.slug == slug && Some(n.id) != exclude_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(slug: &str) -> NoteFields {
        NoteFields {
            title: "Title".to_string(),
            text: "Text".to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_slug_conflicts_across_authors() {
        let repo = MemoryRepository::new();
        let author = repo.create_user("author", "hash").await.unwrap();
        let other = repo.create_user("other", "hash").await.unwrap();

        repo.create_note(author.id, fields("slug")).await.unwrap();
        let result = repo.create_note(other.id, fields("slug")).await;

        assert!(matches!(result, Err(RepositoryError::Conflict("slug"))));
        assert_eq!(repo.note_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let repo = MemoryRepository::new();
        repo.create_user("author", "hash").await.unwrap();

        let result = repo.create_user("author", "hash").await;

        assert!(matches!(result, Err(RepositoryError::Conflict("username"))));
    }

    #[tokio::test]
    async fn lookups_are_scoped_by_author() {
        let repo = MemoryRepository::new();
        let author = repo.create_user("author", "hash").await.unwrap();
        let other = repo.create_user("other", "hash").await.unwrap();
        repo.create_note(author.id, fields("mine")).await.unwrap();

        assert!(repo.get_note(other.id, "mine").await.unwrap().is_none());
        assert!(repo.list_notes(other.id).await.unwrap().is_empty());
        assert!(!repo.delete_note(other.id, "mine").await.unwrap());
        assert!(
            repo.update_note(other.id, "mine", fields("stolen"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(repo.get_note(author.id, "mine").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_keeps_own_slug_but_rejects_taken_one() {
        let repo = MemoryRepository::new();
        let author = repo.create_user("author", "hash").await.unwrap();
        repo.create_note(author.id, fields("first")).await.unwrap();
        repo.create_note(author.id, fields("second")).await.unwrap();

        let updated = repo
            .update_note(author.id, "first", fields("first"))
            .await
            .unwrap();
        assert!(updated.is_some());

        let result = repo.update_note(author.id, "first", fields("second")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict("slug"))));
    }

    #[tokio::test]
    async fn slug_exists_honours_exclusion() {
        let repo = MemoryRepository::new();
        let author = repo.create_user("author", "hash").await.unwrap();
        let note = repo.create_note(author.id, fields("slug")).await.unwrap();

        assert!(repo.slug_exists("slug", None).await.unwrap());
        assert!(!repo.slug_exists("slug", Some(note.id)).await.unwrap());
        assert!(!repo.slug_exists("other", None).await.unwrap());
    }

    #[tokio::test]
    async fn sessions_can_be_removed() {
        let repo = MemoryRepository::new();
        let session = repo.create_session(1, Utc::now()).await.unwrap();

        assert!(repo.get_session(session.token).await.unwrap().is_some());
        assert!(repo.delete_session(session.token).await.unwrap());
        assert!(repo.get_session(session.token).await.unwrap().is_none());
    }
}
