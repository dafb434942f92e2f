use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use std::collections::BTreeMap;

use crate::{forms::NoteForm, models::Note};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note title
    pub title: String,
    /// Note body
    pub text: String,
    /// Unique URL identifier
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            title: note.title,
            text: note.text,
            slug: note.slug,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteRequest {
    /// Note title
    pub title: String,
    /// Note body
    pub text: String,
    /// Derived from the title when omitted or blank
    #[serde(default)]
    pub slug: Option<String>,
}

impl From<NoteRequest> for NoteForm {
    fn from(request: NoteRequest) -> Self {
        Self {
            title: request.title,
            text: request.text,
            slug: request.slug.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Messages keyed by field name; `__all__` holds form-wide errors
    pub errors: BTreeMap<String, Vec<String>>,
}
