//! Reqwest-backed API transport.
//!
//! This adapter owns wire details only: URL resolution against the base URL,
//! bearer and JSON headers, and transport error mapping. Status handling and
//! body decoding stay in the domain.

use std::time::Duration;

use async_trait::async_trait;
use pagination::ensure_same_origin;
use reqwest::{Client, Method, RequestBuilder, Url};

use crate::domain::RequestTarget;
use crate::domain::ports::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, TransportError};

const DEFAULT_USER_AGENT: &str = concat!("restclient/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportSettings {
    /// Backend origin, e.g. `http://127.0.0.1:8000`.
    pub base_url: Url,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// HTTP user-agent sent with each request.
    pub user_agent: String,
}

impl HttpTransportSettings {
    /// Settings with no timeout and the default user-agent.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Transport that sends requests to one backend.
pub struct HttpApiTransport {
    client: Client,
    base_url: Url,
}

impl HttpApiTransport {
    /// Build a transport from its settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: HttpTransportSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(settings.user_agent);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: normalize_base(settings.base_url),
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn builder(&self, request: &ApiRequest) -> Result<RequestBuilder, TransportError> {
        let url = resolve(&self.base_url, &request.target)?;
        let mut builder = self
            .client
            .request(method(request.method), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder)
    }
}

#[async_trait]
impl ApiTransport for HttpApiTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let response = self
            .builder(&request)?
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    base
}

fn resolve(base: &Url, target: &RequestTarget) -> Result<Url, TransportError> {
    match target {
        RequestTarget::Endpoint { endpoint, query } => {
            let path = endpoint.path();
            let mut url = base
                .join(path.trim_start_matches('/'))
                .map_err(|error| TransportError::invalid_request(error.to_string()))?;
            if !query.is_empty() {
                url.query_pairs_mut().extend_pairs(query);
            }
            Ok(url)
        }
        RequestTarget::Link(link) => ensure_same_origin(link, base)
            .cloned()
            .map_err(|error| TransportError::invalid_request(error.to_string())),
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else if error.is_builder() {
        TransportError::invalid_request(error.to_string())
    } else {
        TransportError::network(error.to_string())
    }
}
