mod users;

pub use users::UserService;

use crate::{
    forms::{FormErrors, NoteForm, duplicate_slug_message},
    models::{Note, NoteFields},
    repository::{Repository, RepositoryError},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid form: {0}")]
    Validation(FormErrors),

    #[error("not found")]
    NotFound,

    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("session lifetime {0:?} is out of range")]
    SessionTtl(std::time::Duration),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<FormErrors> for ServiceError {
    fn from(errors: FormErrors) -> Self {
        Self::Validation(errors)
    }
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn Repository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Runs form validation plus the slug uniqueness check. `editing` is the
    /// id of the note being changed, whose own slug doesn't count as taken.
    async fn clean(
        &self,
        form: &NoteForm,
        editing: Option<i64>,
    ) -> Result<NoteFields, ServiceError> {
        let fields = form.clean()?;

        if self.repo.slug_exists(&fields.slug, editing).await? {
            let mut errors = FormErrors::default();
            errors.add("slug", duplicate_slug_message(&fields.slug));
            return Err(errors.into());
        }

        Ok(fields)
    }

    pub async fn create_note(&self, author_id: i64, form: &NoteForm) -> Result<Note, ServiceError> {
        let fields = self.clean(form, None).await?;
        let slug = fields.slug.clone();

        let note = self
            .repo
            .create_note(author_id, fields)
            .await
            .map_err(|e| slug_conflict(e, &slug))?;

        tracing::info!("note '{}' created by user {}", note.slug, author_id);
        Ok(note)
    }

    pub async fn update_note(
        &self,
        author_id: i64,
        slug: &str,
        form: &NoteForm,
    ) -> Result<Note, ServiceError> {
        let current = self.get_note(author_id, slug).await?;
        let fields = self.clean(form, Some(current.id)).await?;
        let new_slug = fields.slug.clone();

        let note = self
            .repo
            .update_note(author_id, slug, fields)
            .await
            .map_err(|e| slug_conflict(e, &new_slug))?
            .ok_or(ServiceError::NotFound)?;

        tracing::info!("note '{}' updated by user {}", note.slug, author_id);
        Ok(note)
    }

    pub async fn delete_note(&self, author_id: i64, slug: &str) -> Result<(), ServiceError> {
        if self.repo.delete_note(author_id, slug).await? {
            tracing::info!("note '{}' deleted by user {}", slug, author_id);
            Ok(())
        } else {
            Err(ServiceError::NotFound)
        }
    }

    pub async fn get_note(&self, author_id: i64, slug: &str) -> Result<Note, ServiceError> {
        self.repo
            .get_note(author_id, slug)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn list_notes(&self, author_id: i64) -> Result<Vec<Note>, ServiceError> {
        Ok(self.repo.list_notes(author_id).await?)
    }
}

/// A unique violation that slipped past [`NoteService::clean`] is reported
/// like any other duplicate slug.
fn slug_conflict(error: RepositoryError, slug: &str) -> ServiceError {
    match error {
        RepositoryError::Conflict("slug") => {
            let mut errors = FormErrors::default();
            errors.add("slug", duplicate_slug_message(slug));
            ServiceError::Validation(errors)
        }
        other => other.into(),
    }
}
