//! List envelope primitives shared by the expense tracker and blog clients.
//!
//! List endpoints answer either with a bare JSON array or with a paginated
//! envelope of the form `{ "count": .., "next": .., "previous": .., "results": [..] }`.
//! [`ListEnvelope`] decodes both shapes and [`Page`] exposes the items in
//! server order together with whatever navigation links were provided.
//!
//! Navigation links are absolute URLs chosen by the server. Callers that
//! attach credentials when following a link should check it with
//! [`ensure_same_origin`] first, so a bearer token never leaves the
//! configured backend origin.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Wire shape of a list response.
///
/// The bare-array variant is tried first so an empty array never decodes as
/// an envelope with missing fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    /// Plain JSON array of records.
    Bare(Vec<T>),
    /// Paginated envelope with optional navigation links.
    Paginated(Paginated<T>),
}

/// Paginated envelope as emitted by page-number and limit/offset paginators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Paginated<T> {
    /// Total number of records across all pages, when reported.
    #[serde(default)]
    pub count: Option<u64>,
    /// Absolute link to the following page.
    #[serde(default)]
    pub next: Option<Url>,
    /// Absolute link to the preceding page.
    #[serde(default)]
    pub previous: Option<Url>,
    /// Records on this page. Missing results decode as an empty page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Errors raised when validating navigation links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageLinkError {
    /// The link points at a different scheme, host, or port than the backend.
    #[error("page link {link} is outside the backend origin {origin}")]
    ForeignOrigin {
        /// Offending link.
        link: String,
        /// Origin the link was checked against.
        origin: String,
    },
}

/// One page of records in server order.
///
/// # Examples
/// ```
/// use pagination::{ListEnvelope, Page};
///
/// let envelope: ListEnvelope<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
/// let page = Page::from(envelope);
/// assert_eq!(page.items(), &[1, 2, 3]);
/// assert!(page.next().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    next: Option<Url>,
    previous: Option<Url>,
}

impl<T> Page<T> {
    /// Build a single page without navigation links.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            next: None,
            previous: None,
        }
    }

    /// Borrow the records on this page.
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consume the page and return its records.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Return `true` when the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Link to the following page, if any.
    pub fn next(&self) -> Option<&Url> {
        self.next.as_ref()
    }

    /// Link to the preceding page, if any.
    pub fn previous(&self) -> Option<&Url> {
        self.previous.as_ref()
    }
}

impl<T> From<ListEnvelope<T>> for Page<T> {
    fn from(envelope: ListEnvelope<T>) -> Self {
        match envelope {
            ListEnvelope::Bare(items) => Self::from_items(items),
            ListEnvelope::Paginated(Paginated {
                next,
                previous,
                results,
                ..
            }) => Self {
                items: results,
                next,
                previous,
            },
        }
    }
}

/// Check that `link` shares scheme, host, and port with `origin`.
///
/// # Errors
///
/// Returns [`PageLinkError::ForeignOrigin`] when the origins differ.
///
/// # Examples
/// ```
/// use pagination::ensure_same_origin;
/// use url::Url;
///
/// let origin = Url::parse("http://127.0.0.1:8000/").unwrap();
/// let link = Url::parse("http://127.0.0.1:8000/api/posts/?page=2").unwrap();
/// assert!(ensure_same_origin(&link, &origin).is_ok());
/// ```
pub fn ensure_same_origin<'a>(link: &'a Url, origin: &Url) -> Result<&'a Url, PageLinkError> {
    if link.origin() == origin.origin() {
        Ok(link)
    } else {
        Err(PageLinkError::ForeignOrigin {
            link: link.to_string(),
            origin: origin.origin().ascii_serialization(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Decoding and link validation coverage.

    use super::*;
    use rstest::rstest;

    fn decode(body: &str) -> Page<serde_json::Value> {
        let envelope: ListEnvelope<serde_json::Value> =
            serde_json::from_str(body).expect("envelope should decode");
        Page::from(envelope)
    }

    #[rstest]
    #[case::bare("[{\"id\": 1}, {\"id\": 2}]", 2)]
    #[case::empty_bare("[]", 0)]
    #[case::paginated("{\"count\": 7, \"next\": null, \"previous\": null, \"results\": [{\"id\": 1}]}", 1)]
    #[case::missing_results("{\"count\": 0}", 0)]
    fn decodes_both_list_shapes(#[case] body: &str, #[case] expected_len: usize) {
        let page = decode(body);
        assert_eq!(page.items().len(), expected_len);
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: u32,
    }

    #[rstest]
    #[case::results("{\"count\": 1, \"results\": [{\"id\": 5}]}", vec![Record { id: 5 }])]
    #[case::missing_results("{\"count\": 0}", Vec::new())]
    fn records_without_a_default_decode(#[case] body: &str, #[case] expected: Vec<Record>) {
        let envelope: ListEnvelope<Record> = serde_json::from_str(body).expect("envelope");
        assert_eq!(Page::from(envelope).into_items(), expected);
    }

    #[test]
    fn keeps_server_order() {
        let page = decode("[{\"id\": 3}, {\"id\": 1}, {\"id\": 2}]");
        let ids: Vec<i64> = page
            .items()
            .iter()
            .filter_map(|item| item.get("id").and_then(serde_json::Value::as_i64))
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn keeps_navigation_links() {
        let page = decode(
            "{\"count\": 42, \"next\": \"http://127.0.0.1:8000/api/posts/?page=2\", \"results\": [{}]}",
        );
        assert_eq!(page.items().len(), 1);
        assert!(page.next().is_some());
        assert!(page.previous().is_none());
    }

    #[test]
    fn rejects_links_to_foreign_origins() {
        let page = decode("{\"next\": \"https://elsewhere.invalid/api/posts/?page=2\", \"results\": []}");
        let origin = Url::parse("http://127.0.0.1:8000/").expect("origin");
        let link = page.next().expect("link present");
        let error = ensure_same_origin(link, &origin).expect_err("foreign link must fail");
        assert!(matches!(error, PageLinkError::ForeignOrigin { .. }));
    }

    #[test]
    fn accepts_links_on_the_backend_origin() {
        let page = decode(
            "{\"previous\": \"http://127.0.0.1:8000/api/transactions/?page=1\", \"results\": []}",
        );
        let origin = Url::parse("http://127.0.0.1:8000/").expect("origin");
        let link = page.previous().expect("link present");
        let checked = ensure_same_origin(link, &origin).expect("same origin");
        assert_eq!(checked.query(), Some("page=1"));
    }
}
