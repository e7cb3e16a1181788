//! Authentication primitives: login credentials and registration forms.
//!
//! Constructors validate raw form input before any request is built, so a
//! rejected form never reaches the network.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Password and confirmation differ.
    PasswordMismatch,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordMismatch => write!(f, "Passwords do not match."),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string sent to the token endpoint.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub(crate) fn payload(&self) -> CredentialsPayload<'_> {
        CredentialsPayload {
            username: self.username(),
            password: self.password(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct CredentialsPayload<'a> {
    username: &'a str,
    password: &'a str,
}

/// Raw registration form fields.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Requested username.
    pub username: String,
    /// Contact email, trimmed before sending.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
}

/// Registration request accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: String,
    email: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a registration form.
    ///
    /// The password and its confirmation must match exactly; the email is
    /// left for the backend to validate.
    pub fn try_from_form(form: &RegistrationForm) -> Result<Self, CredentialsValidationError> {
        let username = form.username.trim();
        if username.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if form.password != form.confirm_password {
            return Err(CredentialsValidationError::PasswordMismatch);
        }
        if form.password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            email: form.email.trim().to_owned(),
            password: Zeroizing::new(form.password.clone()),
        })
    }

    /// Username being registered.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub(crate) fn payload(&self) -> RegistrationPayload<'_> {
        RegistrationPayload {
            username: self.username.as_str(),
            email: self.email.as_str(),
            password: self.password.as_str(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct RegistrationPayload<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("   ", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("user", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", " spaced password ")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn credentials_serialize_as_username_and_password() {
        let creds = LoginCredentials::try_from_parts("ada", "pw").expect("credentials");
        let json = serde_json::to_value(creds.payload()).expect("serialize");
        assert_eq!(json, serde_json::json!({"username": "ada", "password": "pw"}));
    }

    fn form(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            username: " ada ".to_owned(),
            email: " ada@example.com ".to_owned(),
            password: password.to_owned(),
            confirm_password: confirm.to_owned(),
        }
    }

    #[test]
    fn registration_rejects_mismatched_passwords() {
        let err = Registration::try_from_form(&form("one", "two")).expect_err("mismatch");
        assert_eq!(err, CredentialsValidationError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match.");
    }

    #[test]
    fn registration_trims_username_and_email() {
        let registration = Registration::try_from_form(&form("pw", "pw")).expect("valid form");
        let json = serde_json::to_value(registration.payload()).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"username": "ada", "email": "ada@example.com", "password": "pw"})
        );
    }
}
