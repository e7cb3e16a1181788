//! Page navigation targets.
//!
//! Use cases finish by naming the page the user goes to next. The hrefs are
//! the static pages of the browser front ends; the CLI maps each one to the
//! subcommand that shows the same view.

use std::fmt;

use super::PostSlug;

/// A page the user can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Login form.
    Login,
    /// Dashboard or post list.
    Index,
    /// Transaction edit form.
    Edit {
        /// Transaction identifier.
        id: i64,
    },
    /// Post detail view.
    Detail {
        /// Post slug.
        slug: PostSlug,
    },
}

impl Page {
    /// Relative href of the page, including its query parameter.
    ///
    /// # Examples
    /// ```
    /// use client::domain::{Page, PostSlug};
    ///
    /// assert_eq!(Page::Edit { id: 7 }.href(), "edit.html?id=7");
    /// let slug = PostSlug::new("hello").unwrap();
    /// assert_eq!(Page::Detail { slug }.href(), "detail.html?slug=hello");
    /// ```
    pub fn href(&self) -> String {
        match self {
            Self::Login => "login.html".to_owned(),
            Self::Index => "index.html".to_owned(),
            Self::Edit { id } => format!("edit.html?id={id}"),
            Self::Detail { slug } => format!("detail.html?slug={slug}"),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}
