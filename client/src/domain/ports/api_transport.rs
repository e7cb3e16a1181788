//! Driven port for issuing HTTP requests against a backend.
//!
//! The domain owns the request shape; adapters own the wire. Responses are
//! returned raw so status classification and body decoding stay in
//! `ApiClient`, independent of the HTTP library in use.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{AccessToken, RequestTarget};

/// HTTP verbs used by the clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read.
    Get,
    /// Create.
    Post,
    /// Full replace.
    Put,
    /// Partial update.
    Patch,
    /// Remove.
    Delete,
}

impl HttpMethod {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Verb.
    pub method: HttpMethod,
    /// Endpoint or absolute link.
    pub target: RequestTarget,
    /// Bearer token; `None` for anonymous calls.
    pub bearer: Option<AccessToken>,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Request without a token or body.
    pub fn new(method: HttpMethod, target: impl Into<RequestTarget>) -> Self {
        Self {
            method,
            target: target.into(),
            bearer: None,
            body: None,
        }
    }

    /// Attach a bearer token.
    pub fn with_bearer(mut self, token: AccessToken) -> Self {
        self.bearer = Some(token);
        self
    }
}

/// Raw response: any status, undecoded body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body is empty or whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

define_port_error! {
    /// Errors raised before a response status was received.
    pub enum TransportError {
        /// Connection, DNS or TLS failure.
        Network { message: String } =>
            "backend transport failed: {message}",
        /// Request exceeded the configured timeout.
        Timeout { message: String } =>
            "backend request timed out: {message}",
        /// Adapter refused to build the request.
        InvalidRequest { message: String } =>
            "backend request invalid: {message}",
    }
}

/// Port for sending requests to a REST backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send one request and return whatever status came back.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
