//! Domain-level error types.
//!
//! These errors are transport agnostic. The CLI error surface turns them into
//! either a redirect to the login page or a message in the error node; the
//! services themselves never print.

use std::fmt;

use serde_json::Value;

use super::Page;

/// Message shown for any transport failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// No access token is stored; the caller must log in first.
    MissingSession,
    /// The backend rejected the stored token with `401`.
    Unauthorized,
    /// The request never produced a response.
    Network,
    /// The backend answered with a non-success status.
    Server,
    /// Local form validation failed; nothing was sent.
    Validation,
    /// A success response carried a body that could not be decoded.
    Decode,
    /// The session store could not be written.
    Storage,
}

/// Domain error payload.
///
/// `message` is diagnostic text suitable for logs. What the user sees is
/// chosen by [`Error::user_message`]: the server-reported detail when present,
/// otherwise the fallback attached by the use case that failed.
///
/// # Examples
/// ```
/// use client::domain::{Error, ErrorCode};
///
/// let err = Error::server(400, Some("Invalid credentials".to_owned()))
///     .with_fallback("Login failed.");
/// assert_eq!(err.code(), ErrorCode::Server);
/// assert_eq!(err.user_message(), "Invalid credentials");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    status: Option<u16>,
    detail: Option<String>,
    fallback: Option<String>,
    details: Option<Value>,
}

impl Error {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            detail: None,
            fallback: None,
            details: None,
        }
    }

    /// No session is stored.
    pub fn missing_session() -> Self {
        Self::new(ErrorCode::MissingSession, "no access token stored")
    }

    /// The backend rejected the session token.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorCode::Unauthorized, message);
        error.status = Some(401);
        error
    }

    /// Transport failure before any response arrived.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    /// Non-success response. `detail` is the message derived from the body.
    pub fn server(status: u16, detail: Option<String>) -> Self {
        let mut error = Self::new(
            ErrorCode::Server,
            format!("backend responded with status {status}"),
        );
        error.status = Some(status);
        error.detail = detail;
        error
    }

    /// Local validation failure; the message is shown verbatim.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Undecodable success body.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Decode, message)
    }

    /// Session persistence failure.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Storage, message)
    }

    /// Attach the message shown when nothing more specific is known.
    ///
    /// An existing fallback is kept so the innermost use case wins.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        if self.fallback.is_none() {
            self.fallback = Some(fallback.into());
        }
        self
    }

    /// Attach the raw JSON error body.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Diagnostic message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Message the backend reported in the response body.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Raw JSON error body, when one was decoded.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Page the user must be sent to instead of seeing a message.
    pub fn redirect(&self) -> Option<Page> {
        match self.code {
            ErrorCode::MissingSession | ErrorCode::Unauthorized => Some(Page::Login),
            _ => None,
        }
    }

    /// Human-readable message for the error node.
    pub fn user_message(&self) -> String {
        match self.code {
            ErrorCode::Validation => self.message.clone(),
            ErrorCode::Network => NETWORK_ERROR_MESSAGE.to_owned(),
            ErrorCode::Server => self
                .detail
                .clone()
                .or_else(|| self.fallback.clone())
                .unwrap_or_else(|| self.message.clone()),
            ErrorCode::MissingSession
            | ErrorCode::Unauthorized
            | ErrorCode::Decode
            | ErrorCode::Storage => self
                .fallback
                .clone()
                .unwrap_or_else(|| self.message.clone()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {detail}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Error {}
