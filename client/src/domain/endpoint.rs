//! Backend endpoint templates.
//!
//! Paths are fixed; only transaction ids and post slugs are substituted.
//! Every path keeps the trailing slash the backend router expects.

use std::fmt;

use url::Url;

use super::PostSlug;

/// One REST endpoint of the expense tracker or blog backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /api/token/`: expense tracker login.
    ObtainToken,
    /// `POST /api/token/refresh/`: exchange a refresh token.
    RefreshToken,
    /// `POST /api/register/`.
    Register,
    /// `POST /api/login/`: blog login.
    Login,
    /// `GET/POST /api/transactions/`.
    Transactions,
    /// `GET/PUT/DELETE /api/transactions/{id}/`.
    Transaction(i64),
    /// `GET /api/transactions/summary/`.
    TransactionSummary,
    /// `GET /api/categories/`.
    Categories,
    /// `GET/POST /api/posts/`.
    Posts,
    /// `GET/PATCH/DELETE /api/posts/{slug}/`.
    Post(PostSlug),
}

impl Endpoint {
    /// Absolute path of the endpoint.
    ///
    /// # Examples
    /// ```
    /// use client::domain::Endpoint;
    ///
    /// assert_eq!(Endpoint::Transaction(12).path(), "/api/transactions/12/");
    /// ```
    pub fn path(&self) -> String {
        match self {
            Self::ObtainToken => "/api/token/".to_owned(),
            Self::RefreshToken => "/api/token/refresh/".to_owned(),
            Self::Register => "/api/register/".to_owned(),
            Self::Login => "/api/login/".to_owned(),
            Self::Transactions => "/api/transactions/".to_owned(),
            Self::Transaction(id) => format!("/api/transactions/{id}/"),
            Self::TransactionSummary => "/api/transactions/summary/".to_owned(),
            Self::Categories => "/api/categories/".to_owned(),
            Self::Posts => "/api/posts/".to_owned(),
            Self::Post(slug) => format!("/api/posts/{slug}/"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where a request is sent: an endpoint template or a server-issued link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// Endpoint resolved against the configured base URL.
    Endpoint {
        /// Endpoint template.
        endpoint: Endpoint,
        /// Query parameters appended in order.
        query: Vec<(String, String)>,
    },
    /// Absolute pagination link returned by the backend.
    Link(Url),
}

impl RequestTarget {
    /// Endpoint target with query parameters.
    pub fn with_query(endpoint: Endpoint, query: Vec<(String, String)>) -> Self {
        Self::Endpoint { endpoint, query }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Endpoint { endpoint, .. } => endpoint.path(),
            Self::Link(url) => url.path().to_owned(),
        }
    }
}

impl From<Endpoint> for RequestTarget {
    fn from(endpoint: Endpoint) -> Self {
        Self::Endpoint {
            endpoint,
            query: Vec::new(),
        }
    }
}
