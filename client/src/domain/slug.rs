//! Post slug identifiers.
//!
//! Slugs are trimmed, non-empty identifiers composed of ASCII letters,
//! digits, hyphens, and underscores, so they can be placed in a path segment
//! or query string without escaping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`PostSlug::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugValidationError {
    /// Slug was empty or surrounded by whitespace.
    Empty,
    /// Slug contained characters outside the allowed set.
    InvalidCharacters,
}

impl fmt::Display for SlugValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "post slug must not be empty"),
            Self::InvalidCharacters => write!(
                f,
                "post slug may only contain letters, digits, hyphens, or underscores"
            ),
        }
    }
}

impl std::error::Error for SlugValidationError {}

/// Identifier addressing one blog post.
///
/// # Examples
/// ```
/// use client::domain::PostSlug;
///
/// let slug = PostSlug::new("hello-world").unwrap();
/// assert_eq!(slug.as_str(), "hello-world");
/// assert!(PostSlug::new("../admin").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostSlug(String);

impl PostSlug {
    /// Validate and construct a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let raw = value.into();
        if !is_trimmed_non_empty(&raw) {
            return Err(SlugValidationError::Empty);
        }
        if !has_allowed_slug_chars(&raw) {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(raw))
    }

    /// Borrow the slug text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PostSlug {
    type Err = SlugValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PostSlug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostSlug> for String {
    fn from(value: PostSlug) -> Self {
        value.0
    }
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
