//! Resource client shared by every use case.
//!
//! `ApiClient` turns an endpoint, a verb and an optional JSON body into a
//! typed result. It attaches the bearer token, classifies failures into
//! [`Error`] codes, and clears the session when the backend answers `401`
//! to an authenticated call.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error_body::{body_preview, describe_error_body};
use super::guard::require_session;
use super::ports::{
    ApiRequest, ApiResponse, ApiTransport, HttpMethod, SessionStore, TransportError,
};
use super::{Error, RequestTarget, Session};

const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Authenticated REST client over a transport and a session store.
pub struct ApiClient<T, S> {
    transport: Arc<T>,
    sessions: Arc<S>,
}

impl<T, S> Clone for ApiClient<T, S> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<T, S> ApiClient<T, S> {
    /// Create a client from its transport and session store.
    pub fn new(transport: Arc<T>, sessions: Arc<S>) -> Self {
        Self {
            transport,
            sessions,
        }
    }

    /// Session store backing this client.
    pub fn sessions(&self) -> &S {
        &self.sessions
    }
}

impl<T, S> ApiClient<T, S>
where
    T: ApiTransport,
    S: SessionStore,
{
    /// Run the session guard.
    pub fn session(&self) -> Result<Session, Error> {
        require_session(self.sessions.as_ref())
    }

    /// Send an authenticated request and decode the JSON response.
    ///
    /// Fails with `MissingSession` before any I/O when no token is stored.
    pub async fn send<R>(
        &self,
        method: HttpMethod,
        target: impl Into<RequestTarget>,
        body: Option<Value>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let response = self.send_raw(method, target.into(), body).await?;
        decode(&response)
    }

    /// Send an authenticated request whose response body is ignored.
    pub async fn send_discarding(
        &self,
        method: HttpMethod,
        target: impl Into<RequestTarget>,
        body: Option<Value>,
    ) -> Result<(), Error> {
        self.send_raw(method, target.into(), body).await.map(drop)
    }

    /// Send a request without a bearer token, as login and registration do.
    pub async fn send_anonymous<R>(
        &self,
        method: HttpMethod,
        target: impl Into<RequestTarget>,
        body: Option<Value>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let request = ApiRequest {
            body,
            ..ApiRequest::new(method, target)
        };
        let response = self.dispatch(request, false).await?;
        decode(&response)
    }

    /// `GET` a resource.
    pub async fn get<R>(&self, target: impl Into<RequestTarget>) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        self.send(HttpMethod::Get, target, None).await
    }

    /// `POST` a payload.
    pub async fn post<B, R>(&self, target: impl Into<RequestTarget>, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(HttpMethod::Post, target, Some(encode(body)?))
            .await
    }

    /// `PUT` a payload.
    pub async fn put<B, R>(&self, target: impl Into<RequestTarget>, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(HttpMethod::Put, target, Some(encode(body)?)).await
    }

    /// `PATCH` a payload.
    pub async fn patch<B, R>(&self, target: impl Into<RequestTarget>, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(HttpMethod::Patch, target, Some(encode(body)?))
            .await
    }

    /// `DELETE` a resource. An empty `204` body is accepted.
    pub async fn delete(&self, target: impl Into<RequestTarget>) -> Result<(), Error> {
        self.send_discarding(HttpMethod::Delete, target, None).await
    }

    async fn send_raw(
        &self,
        method: HttpMethod,
        target: RequestTarget,
        body: Option<Value>,
    ) -> Result<ApiResponse, Error> {
        let session = self.session()?;
        let request = ApiRequest {
            body,
            ..ApiRequest::new(method, target).with_bearer(session.access().clone())
        };
        self.dispatch(request, true).await
    }

    async fn dispatch(&self, request: ApiRequest, authenticated: bool) -> Result<ApiResponse, Error> {
        let method = request.method;
        let path = request.target.describe();
        let started = Instant::now();
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|error| {
                debug!(%method, %path, %error, "backend request failed");
                map_transport_error(error)
            })?;
        debug!(
            %method,
            %path,
            status = response.status,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "backend responded"
        );

        if response.is_success() {
            return Ok(response);
        }

        let body = describe_error_body(&response.body);
        if response.status == 401 && authenticated {
            warn!(%method, %path, "backend rejected session token; clearing session");
            if let Err(error) = self.sessions.clear() {
                warn!(%error, "failed to clear rejected session");
            }
            return Err(Error::unauthorized(
                body.message
                    .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_owned()),
            ));
        }

        debug!(
            %method,
            %path,
            status = response.status,
            body = %body_preview(&response.body),
            "backend returned an error status"
        );
        let mut error = Error::server(response.status, body.message);
        if let Some(json) = body.json {
            error = error.with_details(json);
        }
        Err(error)
    }
}

fn map_transport_error(error: TransportError) -> Error {
    match error {
        TransportError::Network { message }
        | TransportError::Timeout { message }
        | TransportError::InvalidRequest { message } => Error::network(message),
    }
}

fn encode<B>(body: &B) -> Result<Value, Error>
where
    B: Serialize + ?Sized,
{
    serde_json::to_value(body)
        .map_err(|error| Error::validation(format!("could not encode request body: {error}")))
}

fn decode<R>(response: &ApiResponse) -> Result<R, Error>
where
    R: DeserializeOwned,
{
    let parsed = if response.is_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(&response.body)
    };
    parsed.map_err(|error| {
        Error::decode(format!(
            "unexpected response body ({error}): {}",
            body_preview(&response.body)
        ))
    })
}
