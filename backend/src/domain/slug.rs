//! URL-safe slugs derived from note titles.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and single hyphens. [`Slug::from_title`] is the only way
//! a note obtains one, so the projection stays deterministic: ASCII letters
//! are lowercased, runs of whitespace, hyphens, and underscores collapse into
//! one hyphen, and every other character is dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Slug::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    /// The input was blank.
    #[error("slug must not be empty")]
    Empty,
    /// The input contained characters outside `[a-z0-9-]`.
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacters,
}

/// Normalised, URL-safe projection of a title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a human-readable title.
    ///
    /// The result may be empty when the title holds no ASCII letters or
    /// digits; callers reject such titles before deriving.
    ///
    /// # Examples
    /// ```
    /// use notes_backend::domain::Slug;
    ///
    /// let slug = Slug::from_title("  Hello, World! Rust_&_Go ");
    /// assert_eq!(slug.as_ref(), "hello-world-rust-go");
    /// ```
    #[must_use]
    pub fn from_title(title: &str) -> Self {
        Self(slugify(title))
    }

    /// Validate an externally supplied slug, e.g. from a request path.
    pub fn parse(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(SlugValidationError::Empty);
        }
        if !is_valid_slug(&value) {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// Whether the slug carries no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Return `true` when `title` produces a non-empty slug.
pub(crate) fn title_has_slug(title: &str) -> bool {
    title.chars().any(|ch| ch.is_ascii_alphanumeric())
}

/// Return `true` when `value` is a valid slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    is_trimmed_non_empty(value) && has_allowed_slug_chars(value)
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
        }
    }
    slug
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
