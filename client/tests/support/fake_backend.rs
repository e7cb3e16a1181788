//! In-process REST backend for transport integration tests.
//!
//! Routes are keyed by `"METHOD /path/"` and answer with a canned status and
//! JSON body. Every request is recorded with its headers and body so tests
//! can assert on what reached the wire.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use url::Url;

/// One request as seen by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    routes: Arc<Mutex<HashMap<String, (u16, Value)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBackend {
    /// Answer `method path` with `status` and `body`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(format!("{method} {path}"), (status, body));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Requests whose method and path match.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method && request.path == path)
            .collect()
    }

    fn lookup(&self, method: &str, path: &str) -> (u16, Value) {
        self.routes
            .lock()
            .expect("routes lock")
            .get(&format!("{method} {path}"))
            .cloned()
            .unwrap_or_else(|| (404, json!({"detail": "Not found."})))
    }
}

async fn handle(request: HttpRequest, body: web::Bytes, backend: web::Data<FakeBackend>) -> HttpResponse {
    let method = request.method().as_str().to_owned();
    let path = request.path().to_owned();
    backend.requests.lock().expect("requests lock").push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: request.query_string().to_owned(),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).ok(),
    });

    let (status, payload) = backend.lookup(&method, &path);
    let status = StatusCode::from_u16(status).expect("valid status");
    if status == StatusCode::NO_CONTENT {
        return HttpResponse::NoContent().finish();
    }
    HttpResponse::build(status).json(payload)
}

/// Serve `backend` on an ephemeral port. Stop the returned handle when done.
pub fn start(backend: &FakeBackend) -> (Url, ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let state = backend.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .default_service(web::to(handle))
    })
    .workers(1)
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    let base = Url::parse(&format!("http://{addr}")).expect("base url");
    (base, handle)
}

/// Address nothing listens on.
pub fn closed_port() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("closed url")
}
