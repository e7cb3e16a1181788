//! Blog posts and the forms that create or edit them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::PostSlug;
use super::lenient::first_non_empty;

/// Post author as serialized by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Author {
    /// Plain username.
    Username(String),
    /// User primary key.
    Id(i64),
    /// Nested user object.
    Profile {
        /// Username of the nested user.
        username: String,
    },
}

impl Author {
    /// Author normalized to a display string.
    pub fn display_name(&self) -> String {
        match self {
            Self::Username(username) | Self::Profile { username } => username.clone(),
            Self::Id(id) => id.to_string(),
        }
    }
}

/// Tag reference on a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    /// Tag name.
    Name(String),
    /// Tag primary key.
    Id(i64),
    /// Nested tag object.
    Named {
        /// Tag name.
        name: String,
    },
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) | Self::Named { name } => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// One blog post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Server identifier.
    #[serde(default)]
    pub id: Option<i64>,
    /// URL slug used for detail, edit and delete.
    #[serde(default)]
    pub slug: Option<PostSlug>,
    /// Headline.
    #[serde(default)]
    pub title: Option<String>,
    /// Raw markdown body.
    #[serde(default)]
    pub content: Option<String>,
    /// Server-rendered HTML body.
    #[serde(default)]
    pub html_content: Option<String>,
    /// Author reference.
    #[serde(default)]
    pub author: Option<Author>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Tags attached to the post.
    #[serde(default)]
    pub tags: Vec<TagRef>,
    /// Category reference, kept as sent.
    #[serde(default)]
    pub category: Option<serde_json::Value>,
}

impl Post {
    /// Title, or `Untitled`.
    pub fn display_title(&self) -> &str {
        first_non_empty(&[self.title.as_deref()]).unwrap_or("Untitled")
    }

    /// Author normalized to a string; empty when absent.
    pub fn author_name(&self) -> String {
        self.author
            .as_ref()
            .map(Author::display_name)
            .unwrap_or_default()
    }

    /// HTML body, falling back to the raw content.
    pub fn body(&self) -> &str {
        first_non_empty(&[self.html_content.as_deref(), self.content.as_deref()]).unwrap_or("")
    }

    /// Whether `username` may edit or delete this post.
    pub fn is_authored_by(&self, username: Option<&str>) -> bool {
        match (username, self.author.as_ref()) {
            (Some(user), Some(author)) => !user.is_empty() && author.display_name() == user,
            _ => false,
        }
    }
}

/// Reasons a post form is rejected before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFormError {
    /// Title was blank.
    MissingTitle,
    /// Content was blank.
    MissingContent,
}

impl fmt::Display for PostFormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "Title is required."),
            Self::MissingContent => write!(f, "Content is required."),
        }
    }
}

impl std::error::Error for PostFormError {}

/// Raw post form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    /// Headline.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Category name, optional.
    pub category: String,
    /// Comma-separated tags.
    pub tags: String,
}

/// Split a comma-separated tag field, trimming and dropping empties.
///
/// # Examples
/// ```
/// use client::domain::split_tags;
///
/// assert_eq!(split_tags(" rust, ,web "), vec!["rust", "web"]);
/// ```
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDraft {
    title: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    tags: Vec<String>,
}

impl PostDraft {
    /// Validate a create form.
    pub fn try_from_form(form: &PostForm) -> Result<Self, PostFormError> {
        let (title, content) = required_text(&form.title, &form.content)?;
        let category = Some(form.category.trim())
            .filter(|category| !category.is_empty())
            .map(str::to_owned);
        Ok(Self {
            title,
            content,
            category,
            tags: split_tags(&form.tags),
        })
    }

    /// Tags being attached.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Validated partial update: title and content only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPatch {
    title: String,
    content: String,
}

impl PostPatch {
    /// Validate edited title and content.
    pub fn try_new(title: &str, content: &str) -> Result<Self, PostFormError> {
        let (title, content) = required_text(title, content)?;
        Ok(Self { title, content })
    }
}

fn required_text(title: &str, content: &str) -> Result<(String, String), PostFormError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PostFormError::MissingTitle);
    }
    if content.trim().is_empty() {
        return Err(PostFormError::MissingContent);
    }
    Ok((title.to_owned(), content.to_owned()))
}

/// Filters accepted by the post list endpoint. Matching is
/// case-insensitive on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Category name.
    pub category: Option<String>,
    /// Tag name.
    pub tag: Option<String>,
}

impl PostFilter {
    /// Query parameters in a stable order.
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(category) = first_non_empty(&[self.category.as_deref()]) {
            query.push(("category".to_owned(), category.trim().to_owned()));
        }
        if let Some(tag) = first_non_empty(&[self.tag.as_deref()]) {
            query.push(("tags".to_owned(), tag.trim().to_owned()));
        }
        query
    }
}
