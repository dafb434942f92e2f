//! Submitted form payloads and their field-level validation.
//!
//! Checks that need storage (slug and username uniqueness) live in the
//! services, which add their messages to the same [`FormErrors`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    models::NoteFields,
    slug::{SLUG_MAX_LENGTH, is_valid_slug, slugify},
};

pub const TITLE_MAX_LENGTH: usize = 100;
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Key for errors that do not belong to a single field.
pub const NON_FIELD: &str = "__all__";

const REQUIRED: &str = "This field is required.";

pub fn duplicate_slug_message(slug: &str) -> String {
    format!("{slug} - such a slug already exists, choose a unique value!")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[][..], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteForm {
    /// Validates the fields that don't depend on other notes. A blank slug is
    /// replaced by the slugified title.
    pub fn clean(&self) -> Result<NoteFields, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > TITLE_MAX_LENGTH {
            errors.add(
                "title",
                format!("Ensure this value has at most {TITLE_MAX_LENGTH} characters."),
            );
        }

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let slug = match self.slug.trim() {
            "" => {
                let derived = slugify(title);
                if derived.is_empty() && !title.is_empty() {
                    errors.add("slug", "Could not derive a slug from the title, enter one.");
                }
                derived
            }
            given if !is_valid_slug(given) => {
                errors.add(
                    "slug",
                    format!(
                        "Enter a valid slug of at most {SLUG_MAX_LENGTH} letters, numbers, underscores or hyphens."
                    ),
                );
                given.to_string()
            }
            given => given.to_string(),
        };

        errors.into_result(NoteFields {
            title: title.to_string(),
            text: text.to_string(),
            slug,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl SignupForm {
    /// Returns the trimmed username on success.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username.chars().count() > USERNAME_MAX_LENGTH
            || !username
                .chars()
                .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            errors.add(
                "username",
                format!(
                    "Enter a valid username: at most {USERNAME_MAX_LENGTH} letters, digits and @/./+/-/_ characters."
                ),
            );
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(username.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}
