//! Regression coverage for authentication use cases.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::{
    ApiResponse, MockApiTransport, MockSessionStore, SessionStoreError, TransportError,
};
use crate::domain::{ErrorCode, RequestTarget};

fn respond(status: u16, body: serde_json::Value) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string().into_bytes(),
    }
}

fn service(
    transport: MockApiTransport,
    store: MockSessionStore,
    backend: Backend,
) -> AuthService<MockApiTransport, MockSessionStore> {
    AuthService::new(ApiClient::new(Arc::new(transport), Arc::new(store)), backend)
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("ada", "secret").expect("credentials")
}

#[rstest]
#[case::expenses(Backend::Expenses, Endpoint::ObtainToken)]
#[case::blog(Backend::Blog, Endpoint::Login)]
#[tokio::test]
async fn login_persists_both_tokens(#[case] backend: Backend, #[case] endpoint: Endpoint) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(move |request| {
            request.target == RequestTarget::from(endpoint.clone())
                && request.bearer.is_none()
                && request.body == Some(json!({"username": "ada", "password": "secret"}))
        })
        .return_once(|_| Ok(respond(200, json!({"access": "a.b.c", "refresh": "r.s.t"}))));
    let mut store = MockSessionStore::new();
    store
        .expect_save()
        .times(1)
        .withf(|session| {
            session.access().expose() == "a.b.c"
                && session.refresh().map(RefreshToken::expose) == Some("r.s.t")
        })
        .return_once(|_| Ok(()));

    let page = service(transport, store, backend)
        .login(&credentials())
        .await
        .expect("login succeeds");

    assert_eq!(page, Page::Index);
}

#[tokio::test]
async fn rejected_login_shows_backend_detail() {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .return_once(|_| Ok(respond(401, json!({"detail": "Invalid credentials"}))));
    let mut store = MockSessionStore::new();
    store.expect_save().never();
    store.expect_clear().never();

    let err = service(transport, store, Backend::Expenses)
        .login(&credentials())
        .await
        .expect_err("rejected");

    assert_eq!(err.user_message(), "Invalid credentials");
}

#[rstest]
#[case::expenses(Backend::Expenses, "Login failed.")]
#[case::blog(Backend::Blog, "Login failed")]
#[tokio::test]
async fn rejected_login_without_detail_uses_fallback(
    #[case] backend: Backend,
    #[case] expected: &str,
) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .return_once(|_| Ok(ApiResponse { status: 400, body: b"oops".to_vec() }));

    let err = service(transport, MockSessionStore::new(), backend)
        .login(&credentials())
        .await
        .expect_err("rejected");

    assert_eq!(err.user_message(), expected);
}

#[tokio::test]
async fn login_without_access_token_is_a_decode_error() {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .return_once(|_| Ok(respond(200, json!({"access": ""}))));

    let err = service(transport, MockSessionStore::new(), Backend::Blog)
        .login(&credentials())
        .await
        .expect_err("empty token");

    assert_eq!(err.code(), ErrorCode::Decode);
}

#[tokio::test]
async fn mismatched_passwords_never_reach_the_backend() {
    let mut transport = MockApiTransport::new();
    transport.expect_execute().never();
    let form = RegistrationForm {
        username: "ada".to_owned(),
        email: "ada@example.com".to_owned(),
        password: "one".to_owned(),
        confirm_password: "two".to_owned(),
    };

    let err = service(transport, MockSessionStore::new(), Backend::Expenses)
        .register(&form)
        .await
        .expect_err("mismatch");

    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(err.user_message(), "Passwords do not match.");
}

#[tokio::test]
async fn registration_navigates_to_login() {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.target == RequestTarget::from(Endpoint::Register)
                && request.body
                    == Some(json!({"username": "ada", "email": "ada@example.com", "password": "pw"}))
        })
        .return_once(|_| Ok(respond(201, json!({"id": 1, "username": "ada"}))));
    let form = RegistrationForm {
        username: "ada".to_owned(),
        email: "ada@example.com".to_owned(),
        password: "pw".to_owned(),
        confirm_password: "pw".to_owned(),
    };

    let page = service(transport, MockSessionStore::new(), Backend::Blog)
        .register(&form)
        .await
        .expect("registered");

    assert_eq!(page, Page::Login);
}

#[tokio::test]
async fn registration_field_errors_are_joined() {
    let mut transport = MockApiTransport::new();
    transport.expect_execute().return_once(|_| {
        Ok(respond(
            400,
            json!({"username": ["A user with that username already exists."]}),
        ))
    });
    let form = RegistrationForm {
        username: "ada".to_owned(),
        email: String::new(),
        password: "pw".to_owned(),
        confirm_password: "pw".to_owned(),
    };

    let err = service(transport, MockSessionStore::new(), Backend::Expenses)
        .register(&form)
        .await
        .expect_err("taken");

    assert_eq!(
        err.user_message(),
        "username: A user with that username already exists."
    );
}

#[tokio::test]
async fn registration_network_failure_is_generic() {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .return_once(|_| Err(TransportError::network("refused")));
    let form = RegistrationForm {
        username: "ada".to_owned(),
        email: String::new(),
        password: "pw".to_owned(),
        confirm_password: "pw".to_owned(),
    };

    let err = service(transport, MockSessionStore::new(), Backend::Expenses)
        .register(&form)
        .await
        .expect_err("offline");

    assert_eq!(err.user_message(), "Network error. Please try again.");
}

#[test]
fn logout_clears_and_navigates_to_login() {
    let mut store = MockSessionStore::new();
    store.expect_clear().times(1).return_once(|| Ok(()));

    let page = service(MockApiTransport::new(), store, Backend::Expenses)
        .logout()
        .expect("logout");

    assert_eq!(page, Page::Login);
}

#[test]
fn logout_reports_storage_failures() {
    let mut store = MockSessionStore::new();
    store
        .expect_clear()
        .return_once(|| Err(SessionStoreError::io("permission denied")));

    let err = service(MockApiTransport::new(), store, Backend::Expenses)
        .logout()
        .expect_err("storage");

    assert_eq!(err.code(), ErrorCode::Storage);
    assert_eq!(err.user_message(), "Logout failed.");
}

fn stored_session() -> Session {
    Session::new(
        AccessToken::new("old.access.token").expect("access"),
        Some(RefreshToken::new("refresh.token.value").expect("refresh")),
    )
}

#[tokio::test]
async fn refresh_keeps_refresh_token_when_not_rotated() {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.target == RequestTarget::from(Endpoint::RefreshToken)
                && request.body == Some(json!({"refresh": "refresh.token.value"}))
        })
        .return_once(|_| Ok(respond(200, json!({"access": "new.access.token"}))));
    let mut store = MockSessionStore::new();
    store
        .expect_load()
        .return_once(|| Ok(Some(stored_session())));
    store
        .expect_save()
        .times(1)
        .withf(|session| {
            session.access().expose() == "new.access.token"
                && session.refresh().map(RefreshToken::expose) == Some("refresh.token.value")
        })
        .return_once(|_| Ok(()));

    service(transport, store, Backend::Expenses)
        .refresh()
        .await
        .expect("refreshed");
}

#[tokio::test]
async fn rejected_refresh_clears_session() {
    let mut transport = MockApiTransport::new();
    transport.expect_execute().return_once(|_| {
        Ok(respond(
            401,
            json!({"detail": "Token is invalid or expired", "code": "token_not_valid"}),
        ))
    });
    let mut store = MockSessionStore::new();
    store
        .expect_load()
        .return_once(|| Ok(Some(stored_session())));
    store.expect_clear().times(1).return_once(|| Ok(()));

    let err = service(transport, store, Backend::Expenses)
        .refresh()
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.redirect(), Some(Page::Login));
}

#[tokio::test]
async fn refresh_without_refresh_token_redirects() {
    let mut transport = MockApiTransport::new();
    transport.expect_execute().never();
    let mut store = MockSessionStore::new();
    store.expect_load().return_once(|| {
        Ok(Some(Session::new(
            AccessToken::new("a.b.c").expect("access"),
            None,
        )))
    });

    let err = service(transport, store, Backend::Blog)
        .refresh()
        .await
        .expect_err("no refresh token");

    assert_eq!(err.code(), ErrorCode::MissingSession);
}
