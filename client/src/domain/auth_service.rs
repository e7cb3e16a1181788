//! Login, registration, logout and token refresh.
//!
//! Login and registration are anonymous calls. On success the token pair is
//! written to the session store before navigation proceeds.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::ports::{ApiTransport, HttpMethod, SessionStore};
use super::{
    AccessToken, ApiClient, Endpoint, Error, LoginCredentials, Page, RefreshToken, Registration,
    RegistrationForm, Session,
};

/// Which backend a login goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Expense tracker: `POST /api/token/`.
    Expenses,
    /// Blog: `POST /api/login/`.
    Blog,
}

impl Backend {
    fn login_endpoint(self) -> Endpoint {
        match self {
            Self::Expenses => Endpoint::ObtainToken,
            Self::Blog => Endpoint::Login,
        }
    }

    fn login_fallback(self) -> &'static str {
        match self {
            Self::Expenses => "Login failed.",
            Self::Blog => "Login failed",
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenPair {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

impl TokenPair {
    fn into_tokens(self) -> Result<(AccessToken, Option<RefreshToken>), Error> {
        let access = AccessToken::new(self.access)
            .map_err(|err| Error::decode(format!("access token rejected: {err}")))?;
        let refresh = self
            .refresh
            .map(RefreshToken::new)
            .transpose()
            .map_err(|err| Error::decode(format!("refresh token rejected: {err}")))?;
        Ok((access, refresh))
    }
}

/// Authentication use cases.
pub struct AuthService<T, S> {
    client: ApiClient<T, S>,
    backend: Backend,
}

impl<T, S> AuthService<T, S> {
    /// Create the service for one backend.
    pub fn new(client: ApiClient<T, S>, backend: Backend) -> Self {
        Self { client, backend }
    }
}

impl<T, S> AuthService<T, S>
where
    T: ApiTransport,
    S: SessionStore,
{
    /// Exchange credentials for tokens and persist them.
    ///
    /// Returns [`Page::Index`] on success. A rejected login surfaces the
    /// backend's `detail`, falling back to "Login failed.".
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Page, Error> {
        let fallback = self.backend.login_fallback();
        let pair: TokenPair = self
            .client
            .send_anonymous(
                HttpMethod::Post,
                self.backend.login_endpoint(),
                Some(json!(credentials.payload())),
            )
            .await
            .map_err(|err| err.with_fallback(fallback))?;
        let (access, refresh) = pair.into_tokens().map_err(|err| err.with_fallback(fallback))?;
        self.persist(&Session::new(access, refresh))?;
        info!(username = credentials.username(), "signed in");
        Ok(Page::Index)
    }

    /// Validate and submit a registration form.
    ///
    /// Mismatched passwords are rejected without a request. Returns
    /// [`Page::Login`] on success.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Page, Error> {
        let registration =
            Registration::try_from_form(form).map_err(|err| Error::validation(err.to_string()))?;
        self.client
            .send_anonymous::<serde_json::Value>(
                HttpMethod::Post,
                Endpoint::Register,
                Some(json!(registration.payload())),
            )
            .await
            .map_err(|err| err.with_fallback("Registration failed"))?;
        info!(username = registration.username(), "registered");
        Ok(Page::Login)
    }

    /// Forget both tokens. Returns [`Page::Login`].
    pub fn logout(&self) -> Result<Page, Error> {
        self.client
            .sessions()
            .clear()
            .map_err(|err| Error::storage(err.to_string()).with_fallback("Logout failed."))?;
        info!("signed out");
        Ok(Page::Login)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// A rejected refresh token clears the session and redirects to login.
    pub async fn refresh(&self) -> Result<(), Error> {
        let session = self.client.session()?;
        let Some(refresh) = session.refresh() else {
            return Err(Error::missing_session());
        };
        let result = self
            .client
            .send_anonymous::<TokenPair>(
                HttpMethod::Post,
                Endpoint::RefreshToken,
                Some(json!({ "refresh": refresh.expose() })),
            )
            .await;
        let pair = match result {
            Ok(pair) => pair,
            Err(err) if err.status() == Some(401) => {
                self.client
                    .sessions()
                    .clear()
                    .map_err(|clear| Error::storage(clear.to_string()))?;
                return Err(Error::unauthorized(
                    err.detail().unwrap_or("Refresh token rejected.").to_owned(),
                ));
            }
            Err(err) => return Err(err.with_fallback("Failed to refresh session")),
        };
        let (access, rotated) = pair.into_tokens()?;
        let next = match rotated {
            Some(rotated) => Session::new(access, Some(rotated)),
            None => session.with_access(access),
        };
        self.persist(&next)
    }

    fn persist(&self, session: &Session) -> Result<(), Error> {
        self.client
            .sessions()
            .save(session)
            .map_err(|err| Error::storage(err.to_string()).with_fallback("Could not save session."))
    }
}

#[cfg(test)]
mod tests;
