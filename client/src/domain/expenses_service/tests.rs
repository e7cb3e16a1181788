//! Regression coverage for expense tracker use cases.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    ApiRequest, ApiResponse, HttpMethod, MockApiTransport, MockSessionStore,
};
use crate::domain::{AccessToken, ErrorCode, Session};

fn respond(status: u16, body: Value) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string().into_bytes(),
    }
}

fn is_get(request: &ApiRequest, endpoint: &Endpoint) -> bool {
    matches!(
        &request.target,
        RequestTarget::Endpoint { endpoint: target, .. } if target == endpoint
    ) && request.method == HttpMethod::Get
}

#[fixture]
fn signed_in() -> MockSessionStore {
    let mut store = MockSessionStore::new();
    store.expect_load().returning(|| {
        Ok(Some(Session::new(
            AccessToken::new("a.b.c").expect("token"),
            None,
        )))
    });
    store
}

#[fixture]
fn form() -> TransactionForm {
    TransactionForm {
        description: "Coffee".to_owned(),
        amount: "3.50".to_owned(),
        category: "2".to_owned(),
        date: "2024-01-01".to_owned(),
        kind: "expense".to_owned(),
    }
}

fn service(
    transport: MockApiTransport,
    store: MockSessionStore,
) -> ExpensesService<MockApiTransport, MockSessionStore> {
    ExpensesService::new(ApiClient::new(Arc::new(transport), Arc::new(store)))
}

fn expect_reload(transport: &mut MockApiTransport) {
    transport
        .expect_execute()
        .times(1)
        .withf(|request| is_get(request, &Endpoint::TransactionSummary))
        .returning(|_| Ok(respond(200, json!({"total_income": "0", "total_expenses": "0"}))));
    transport
        .expect_execute()
        .times(1)
        .withf(|request| is_get(request, &Endpoint::Transactions))
        .returning(|_| Ok(respond(200, json!([]))));
}

#[rstest]
#[tokio::test]
async fn dashboard_loads_all_three_sections(signed_in: MockSessionStore) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(|request| is_get(request, &Endpoint::TransactionSummary))
        .returning(|_| {
            Ok(respond(
                200,
                json!({"total_income": "10.00", "total_expenses": "3.50", "net_balance": "6.50"}),
            ))
        });
    transport
        .expect_execute()
        .times(1)
        .withf(|request| is_get(request, &Endpoint::Transactions))
        .returning(|_| {
            Ok(respond(
                200,
                json!([{"id": 1, "title": "Coffee", "amount": "3.50", "type": "expense",
                        "category": 2, "created_at": "2024-01-01T00:00:00Z"}]),
            ))
        });
    transport
        .expect_execute()
        .times(1)
        .withf(|request| is_get(request, &Endpoint::Categories))
        .returning(|_| Ok(respond(200, json!([{"id": 2, "name": "Food"}]))));

    let dashboard = service(transport, signed_in)
        .dashboard(&TransactionQuery::First, None)
        .await
        .expect("dashboard");

    let summary = dashboard.ledger.summary.expect("summary");
    assert_eq!(summary.expenses().to_string(), "3.50");
    let transactions = dashboard.ledger.transactions.expect("transactions");
    assert_eq!(transactions.items().len(), 1);
    assert_eq!(dashboard.categories.expect("categories")[0].label(), "Food");
}

#[rstest]
#[tokio::test]
async fn dashboard_sections_fail_independently(signed_in: MockSessionStore) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .withf(|request| is_get(request, &Endpoint::TransactionSummary))
        .returning(|_| Ok(ApiResponse { status: 500, body: b"boom".to_vec() }));
    transport
        .expect_execute()
        .withf(|request| is_get(request, &Endpoint::Transactions))
        .returning(|_| Ok(respond(200, json!({"count": 0, "results": []}))));
    transport
        .expect_execute()
        .withf(|request| is_get(request, &Endpoint::Categories))
        .returning(|_| Ok(ApiResponse { status: 503, body: Vec::new() }));

    let dashboard = service(transport, signed_in)
        .dashboard(&TransactionQuery::First, None)
        .await
        .expect("dashboard");

    assert_eq!(
        dashboard.ledger.summary.as_ref().expect_err("summary fails").user_message(),
        "Failed to fetch summary"
    );
    assert!(dashboard.ledger.transactions.as_ref().expect("list loads").is_empty());
    assert_eq!(
        dashboard.categories.as_ref().expect_err("categories fail").user_message(),
        "Failed to fetch categories"
    );
    assert_eq!(dashboard.redirect(), None);
}

#[tokio::test]
async fn dashboard_without_session_issues_no_requests() {
    let mut transport = MockApiTransport::new();
    transport.expect_execute().never();
    let mut store = MockSessionStore::new();
    store.expect_load().returning(|| Ok(None));

    let err = service(transport, store)
        .dashboard(&TransactionQuery::First, None)
        .await
        .expect_err("signed out");

    assert_eq!(err.redirect(), Some(Page::Login));
}

#[rstest]
#[tokio::test]
async fn filters_and_month_become_query_parameters(signed_in: MockSessionStore) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.target
                == RequestTarget::with_query(
                    Endpoint::TransactionSummary,
                    vec![("month".to_owned(), "2024-03".to_owned())],
                )
        })
        .returning(|_| Ok(respond(200, json!({}))));
    transport
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.target
                == RequestTarget::with_query(
                    Endpoint::Transactions,
                    vec![("category".to_owned(), "4".to_owned())],
                )
        })
        .returning(|_| Ok(respond(200, json!([]))));
    transport
        .expect_execute()
        .times(1)
        .withf(|request| is_get(request, &Endpoint::Categories))
        .returning(|_| Ok(respond(200, json!([]))));

    let query = TransactionQuery::Filtered(TransactionFilter {
        category: Some(4),
        ..TransactionFilter::default()
    });
    let month = "2024-03".parse().ok();
    let dashboard = service(transport, signed_in)
        .dashboard(&query, month)
        .await
        .expect("dashboard");

    assert_eq!(dashboard.ledger.summary.expect("summary").balance().to_string(), "0");
}

#[rstest]
#[tokio::test]
async fn next_link_is_followed_verbatim(signed_in: MockSessionStore) {
    let link = Url::parse("http://127.0.0.1:8000/api/transactions/?page=2").expect("url");
    let expected = RequestTarget::Link(link.clone());
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(move |request| request.target == expected)
        .returning(|_| {
            Ok(respond(
                200,
                json!({"count": 3, "previous": "http://127.0.0.1:8000/api/transactions/",
                       "results": [{"id": 3, "title": "Rent", "amount": 500}]}),
            ))
        });

    let page = service(transport, signed_in)
        .transactions(&TransactionQuery::Link(link))
        .await
        .expect("page two");

    assert_eq!(page.items().len(), 1);
    assert!(page.next().is_none());
    assert!(page.previous().is_some());
}

#[rstest]
#[tokio::test]
async fn invalid_amount_blocks_submission(signed_in: MockSessionStore, form: TransactionForm) {
    let mut transport = MockApiTransport::new();
    transport.expect_execute().never();
    let invalid = TransactionForm {
        amount: "abc".to_owned(),
        ..form
    };

    let err = service(transport, signed_in)
        .create(&invalid)
        .await
        .expect_err("invalid amount");

    assert_eq!(err.code(), ErrorCode::Validation);
    assert!(err.user_message().starts_with("Please fill all fields correctly"));
}

#[rstest]
#[tokio::test]
async fn create_posts_then_reloads(signed_in: MockSessionStore, form: TransactionForm) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.method == HttpMethod::Post
                && request.body
                    == Some(json!({"title": "Coffee", "amount": "3.50", "category": 2,
                                   "date": "2024-01-01", "type": "expense"}))
        })
        .returning(|_| Ok(respond(201, json!({"id": 11, "title": "Coffee"}))));
    expect_reload(&mut transport);

    let ledger = service(transport, signed_in)
        .create(&form)
        .await
        .expect("created");

    assert!(ledger.summary.is_ok());
    assert!(ledger.transactions.is_ok());
}

#[rstest]
#[tokio::test]
async fn create_surfaces_field_errors(signed_in: MockSessionStore, form: TransactionForm) {
    let mut transport = MockApiTransport::new();
    transport.expect_execute().returning(|_| {
        Ok(respond(400, json!({"category": ["Invalid pk \"2\" - object does not exist."]})))
    });

    let err = service(transport, signed_in)
        .create(&form)
        .await
        .expect_err("rejected");

    assert_eq!(
        err.user_message(),
        "category: Invalid pk \"2\" - object does not exist."
    );
}

#[rstest]
#[tokio::test]
async fn delete_hits_id_endpoint_then_reloads(signed_in: MockSessionStore) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.method == HttpMethod::Delete
                && request.target == RequestTarget::from(Endpoint::Transaction(7))
        })
        .returning(|_| Ok(ApiResponse { status: 204, body: Vec::new() }));
    expect_reload(&mut transport);

    let ledger = service(transport, signed_in).delete(7).await.expect("deleted");

    assert!(ledger.transactions.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_delete_skips_reload(signed_in: MockSessionStore) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .returning(|_| Ok(ApiResponse { status: 404, body: b"<html>".to_vec() }));

    let err = service(transport, signed_in)
        .delete(7)
        .await
        .expect_err("missing");

    assert_eq!(err.user_message(), "Failed to delete transaction");
}

#[rstest]
#[tokio::test]
async fn edit_form_keeps_transaction_when_categories_fail(signed_in: MockSessionStore) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(|request| is_get(request, &Endpoint::Transaction(5)))
        .returning(|_| {
            Ok(respond(
                200,
                json!({"id": 5, "title": "Rent", "amount": "500.00", "category": 1,
                       "date": "2024-02-01", "type": "expense"}),
            ))
        });
    transport
        .expect_execute()
        .times(1)
        .withf(|request| is_get(request, &Endpoint::Categories))
        .returning(|_| Ok(ApiResponse { status: 500, body: Vec::new() }));

    let edit = service(transport, signed_in).edit_form(5).await.expect("edit form");

    assert_eq!(edit.transaction.display_description(), "Rent");
    assert_eq!(
        edit.categories.expect_err("categories").user_message(),
        "Could not load categories."
    );
}

#[rstest]
#[tokio::test]
async fn update_puts_and_returns_to_index(signed_in: MockSessionStore, form: TransactionForm) {
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.method == HttpMethod::Put
                && request.target == RequestTarget::from(Endpoint::Transaction(5))
        })
        .returning(|_| Ok(respond(200, json!({"id": 5}))));

    let page = service(transport, signed_in)
        .update(5, &form)
        .await
        .expect("updated");

    assert_eq!(page, Page::Index);
}

#[rstest]
#[tokio::test]
async fn unauthorized_dashboard_load_redirects(signed_in: MockSessionStore) {
    let mut store = signed_in;
    store.expect_clear().returning(|| Ok(()));
    let mut transport = MockApiTransport::new();
    transport
        .expect_execute()
        .returning(|_| Ok(respond(401, json!({"detail": "Token expired"}))));

    let dashboard = service(transport, store)
        .dashboard(&TransactionQuery::First, None)
        .await
        .expect("loads ran");

    assert_eq!(dashboard.redirect(), Some(Page::Login));
}
