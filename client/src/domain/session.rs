//! Session tokens held between commands.
//!
//! A session is an access token plus an optional refresh token, persisted
//! under the storage keys [`ACCESS_KEY`] and [`REFRESH_KEY`]. The client never
//! validates tokens locally; the backend answers `401` when one is stale.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use zeroize::Zeroizing;

/// Storage key for the access token.
pub const ACCESS_KEY: &str = "access";
/// Storage key for the refresh token.
pub const REFRESH_KEY: &str = "refresh";

/// Validation errors raised when wrapping token strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    /// Token was empty after trimming.
    Empty,
    /// Token contained whitespace, which would corrupt the bearer header.
    ContainsWhitespace,
}

impl fmt::Display for TokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "token must not be empty"),
            Self::ContainsWhitespace => write!(f, "token must not contain whitespace"),
        }
    }
}

impl std::error::Error for TokenValidationError {}

fn validate_token(raw: &str) -> Result<(), TokenValidationError> {
    if raw.trim().is_empty() {
        return Err(TokenValidationError::Empty);
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(TokenValidationError::ContainsWhitespace);
    }
    Ok(())
}

macro_rules! secret_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(Zeroizing<String>);

        impl $name {
            /// Validate and wrap a raw token string.
            pub fn new(raw: impl Into<String>) -> Result<Self, TokenValidationError> {
                let raw = Zeroizing::new(raw.into());
                validate_token(&raw)?;
                Ok(Self(raw))
            }

            /// Expose the raw token for headers and storage.
            pub fn expose(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(<redacted>)"))
            }
        }
    };
}

secret_token! {
    /// Short-lived JWT sent as `Authorization: Bearer <token>`.
    AccessToken
}

secret_token! {
    /// Long-lived JWT exchanged for a new access token.
    RefreshToken
}

/// Claims read from the access token payload.
///
/// Only used for display decisions such as offering edit actions to a
/// post's author. Signatures are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Username claim, when the backend includes one.
    #[serde(default)]
    pub username: Option<String>,
}

/// Errors raised while reading token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// Token did not have three dot-separated segments.
    Malformed,
    /// Payload segment was not base64url.
    Encoding,
    /// Payload was not a JSON object.
    Payload,
}

impl fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "token is not a three-part JWT"),
            Self::Encoding => write!(f, "token payload is not base64url encoded"),
            Self::Payload => write!(f, "token payload is not a JSON object"),
        }
    }
}

impl std::error::Error for ClaimsError {}

impl AccessToken {
    /// Decode the payload segment of the JWT.
    ///
    /// # Examples
    /// ```
    /// use client::domain::AccessToken;
    ///
    /// // {"username":"ada"}
    /// let token = AccessToken::new("e30.eyJ1c2VybmFtZSI6ImFkYSJ9.c2ln").unwrap();
    /// assert_eq!(token.claims().unwrap().username.as_deref(), Some("ada"));
    /// ```
    pub fn claims(&self) -> Result<TokenClaims, ClaimsError> {
        let mut segments = self.expose().split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(ClaimsError::Malformed),
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| ClaimsError::Encoding)?;
        serde_json::from_slice(&bytes).map_err(|_| ClaimsError::Payload)
    }
}

/// Tokens for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    access: AccessToken,
    refresh: Option<RefreshToken>,
}

impl Session {
    /// Build a session from its tokens.
    pub fn new(access: AccessToken, refresh: Option<RefreshToken>) -> Self {
        Self { access, refresh }
    }

    /// Access token attached to authenticated requests.
    pub fn access(&self) -> &AccessToken {
        &self.access
    }

    /// Refresh token, when the backend issued one.
    pub fn refresh(&self) -> Option<&RefreshToken> {
        self.refresh.as_ref()
    }

    /// Replace the access token, keeping the refresh token.
    pub fn with_access(self, access: AccessToken) -> Self {
        Self {
            access,
            refresh: self.refresh,
        }
    }

    /// Username claim of the access token, if readable.
    pub fn username(&self) -> Option<String> {
        self.access.claims().ok().and_then(|claims| claims.username)
    }
}
