//! Tags that notes reference.

use std::fmt;

use super::identifier::define_identifier;

define_identifier!(
    /// Stable tag identifier.
    TagId
);

/// Maximum length of a tag name in characters.
pub const TAG_NAME_MAX: usize = 64;

/// Validation errors for [`TagName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagValidationError {
    /// The name was blank.
    #[error("tag name must not be empty")]
    EmptyName,
    /// The name exceeded [`TAG_NAME_MAX`].
    #[error("tag name must be at most {max} characters")]
    NameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Human-readable tag label, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Validate and construct a tag name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, TagValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        if trimmed.chars().count() > TAG_NAME_MAX {
            return Err(TagValidationError::NameTooLong { max: TAG_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A label that notes can be grouped by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    id: TagId,
    name: TagName,
}

impl Tag {
    /// Construct a tag.
    pub const fn new(id: TagId, name: TagName) -> Self {
        Self { id, name }
    }

    /// Tag identifier.
    pub const fn id(&self) -> TagId {
        self.id
    }

    /// Tag label.
    pub const fn name(&self) -> &TagName {
        &self.name
    }

    /// Replace the label.
    pub fn rename(&mut self, name: TagName) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  rust  ", "rust")]
    #[case("Work", "Work")]
    fn trims_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(TagName::new(input).expect("valid").as_ref(), expected);
    }

    #[rstest]
    fn rejects_blank_and_long_names() {
        assert_eq!(TagName::new("  "), Err(TagValidationError::EmptyName));
        let long = "x".repeat(TAG_NAME_MAX + 1);
        assert_eq!(
            TagName::new(long),
            Err(TagValidationError::NameTooLong { max: TAG_NAME_MAX })
        );
    }
}
