//! Router tests against an in-memory backend

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use debweb_api::{create_router, AppState};
use debweb_config::Config;
use debweb_core::transport::testing::RecordingTransport;
use debweb_core::{BackendApi, CoreError};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> (Router, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let api = BackendApi::new(transport.clone());
    (create_router(AppState::new(Config::default(), api)), transport)
}

async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(router: Router, uri: &str, body: &str) -> Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn header_text(response: &Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn health_answers_ok() {
    let (router, _) = app();
    let response = get(router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn customer_search_sends_one_request() {
    let (router, transport) = app();
    transport.respond(
        "GET /api/customers",
        json!({
            "success": true,
            "data": [{ "_id": "c1", "customerName": "Rahim", "mobileNumber": "01711111111" }],
            "pagination": { "currentPage": 1, "totalPages": 1, "totalItems": 1 }
        }),
    );
    let response = get(router, "/customers/list?search=Rahim").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Rahim"));
    assert_eq!(transport.log(), vec!["GET /api/customers?search=Rahim&page=1"]);
}

#[tokio::test]
async fn inverted_range_renders_empty_state() {
    let (router, transport) = app();
    let response = get(
        router,
        "/daily-transactions/list?startDate=2024-05-10&endDate=2024-05-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_text(&response, "HX-Reswap").is_empty());
    let html = body_text(response).await;
    assert!(html.contains("No transactions match the selected filters."));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn backend_failure_keeps_region_and_notifies() {
    let (router, transport) = app();
    transport.fail("GET /api/customers", CoreError::Network { message: "refused".to_string() });
    let response = get(router, "/customers/list").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_text(&response, "HX-Reswap"), "none");
    let trigger = header_text(&response, "HX-Trigger");
    assert!(trigger.contains("notify"));
    assert!(trigger.contains("Could not reach the server"));
}

#[tokio::test]
async fn delete_without_id_sends_nothing() {
    let (router, transport) = app();
    let response = post_form(router, "/customers/delete", "id=&confirm=yes").await;
    assert_eq!(header_text(&response, "HX-Reswap"), "none");
    assert!(header_text(&response, "HX-Trigger").contains("No customer selected."));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn unconfirmed_delete_sends_nothing() {
    let (router, transport) = app();
    let response = post_form(router, "/customers/delete", "id=c1&label=Rahim").await;
    assert_eq!(header_text(&response, "HX-Reswap"), "none");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn confirmed_delete_issues_one_delete_and_refreshes() {
    let (router, transport) = app();
    let response = post_form(router, "/customers/delete", "id=c1&label=Rahim&confirm=yes").await;
    assert_eq!(response.status(), StatusCode::OK);
    let trigger = header_text(&response, "HX-Trigger");
    assert!(trigger.contains("customers:refresh"));
    assert!(trigger.contains("modal:close"));
    assert_eq!(transport.log(), vec!["DELETE /api/customers/c1"]);
}

#[tokio::test]
async fn daily_log_delete_follows_entry_kind() {
    let (router, transport) = app();
    post_form(router, "/daily-log/delete", "id=d9&kind=debit&confirm=yes").await;
    assert_eq!(transport.log(), vec!["DELETE /api/debit/d9"]);
}

#[tokio::test]
async fn empty_export_is_refused() {
    let (router, transport) = app();
    let response = get(router, "/daily-transactions/pdf?entryBy=deb").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["level"], "info");
    assert_eq!(transport.request_count(), 1);
    assert!(transport.log()[0].starts_with("GET /api/credit/download-pdf?entryBy=deb&limit="));
}

#[tokio::test]
async fn export_returns_pdf_attachment() {
    let (router, transport) = app();
    transport.respond(
        "GET /api/credit/download-pdf",
        json!({
            "success": true,
            "data": [{
                "_id": "t1",
                "customerName": "Rahim",
                "company": "Bkash Personal",
                "selectedAccount": "01711111111",
                "newAmount": 250,
                "entryBy": "deb",
                "createdAt": "2024-05-01T10:00:00.000Z"
            }]
        }),
    );
    let response = get(router, "/daily-transactions/pdf?startDate=2024-05-01&endDate=2024-05-31").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_text(&response, "content-type"), "application/pdf");
    let disposition = header_text(&response, "content-disposition");
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("2024-05-01_to_2024-05-31.pdf"));
}

#[tokio::test]
async fn credit_submit_posts_and_resets_form() {
    let (router, transport) = app();
    transport.respond(
        "GET /api/mobileAccounts/company",
        json!({
            "success": true,
            "data": [{ "_id": "a1", "selectCompany": "Bkash Personal", "mobileNumber": "01711111111", "totalAmount": 500 }]
        }),
    );
    let response = post_form(
        router,
        "/credit",
        "customerName=Rahim&customerNumber=01811111111&company=Bkash+Personal&selectedAccount=01711111111&amount=200&entryBy=deb",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let trigger = header_text(&response, "HX-Trigger");
    assert!(trigger.contains("Credit saved"));
    assert!(trigger.contains("transactions:refresh"));

    let html = body_text(response).await;
    assert!(html.contains("Select a company first"));
    assert!(html.contains("<option value='aditto' selected>"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(transport.log()[0], "GET /api/mobileAccounts/company?selectCompany=Bkash%20Personal");
    let body = requests[1].body.clone().unwrap();
    assert_eq!(requests[1].path, "/api/credit");
    assert_eq!(body["newAmount"], 200.0);
    assert_eq!(body["selectedNumber"], "500");
    assert_eq!(body["entryBy"], "deb");
}

#[tokio::test]
async fn credit_validation_keeps_input_and_sends_nothing_else() {
    let (router, transport) = app();
    let response = post_form(router, "/credit", "customerName=Rahim&amount=abc").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_text(&response, "HX-Reswap").is_empty());
    let html = body_text(response).await;
    assert!(html.contains("Company is required"));
    assert!(html.contains("Enter a valid amount"));
    assert!(html.contains("value='Rahim'"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn company_change_clears_number() {
    let (router, transport) = app();
    let response = get(
        router,
        "/debit/form?changed=company&company=Nagad+Agent&selectedAccount=01711111111",
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains("No accounts for this company"));
    assert_eq!(transport.log(), vec!["GET /api/mobileAccounts/company?selectCompany=Nagad%20Agent"]);
}

#[tokio::test]
async fn statement_bulk_delete() {
    let (router, transport) = app();
    let response = post_form(router.clone(), "/statement/delete", "confirm=yes").await;
    assert_eq!(header_text(&response, "HX-Reswap"), "none");
    assert_eq!(transport.request_count(), 0);

    let response = post_form(router, "/statement/delete", "ids=s1&ids=s2&confirm=yes").await;
    assert!(header_text(&response, "HX-Trigger").contains("statement:refresh"));
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/credit/statement-delete");
    assert_eq!(requests[0].body, Some(json!({ "ids": ["s1", "s2"] })));
}

#[tokio::test]
async fn statement_single_selection_is_a_list() {
    let (router, transport) = app();
    let response = post_form(router, "/statement/delete", "ids=s%201&confirm=yes").await;
    assert!(header_text(&response, "HX-Trigger").contains("statement:refresh"));
    assert_eq!(transport.requests()[0].body, Some(json!({ "ids": ["s 1"] })));
}

#[tokio::test]
async fn statement_without_account_sends_nothing() {
    let (router, transport) = app();
    let html = body_text(get(router, "/statement/list").await).await;
    assert!(html.contains("Enter an account number"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn due_give_posts_to_customer_ledger() {
    let (router, transport) = app();
    let response = post_form(
        router,
        "/due/give",
        "mobileNumber=01711111111&amount=300&notes=rice&date=2024-05-02",
    )
    .await;
    assert!(header_text(&response, "HX-Trigger").contains("due:refresh"));
    let requests = transport.requests();
    assert_eq!(requests[0].path, "/api/transactions/give/01711111111");
    assert_eq!(
        requests[0].body,
        Some(json!({ "amount": 300.0, "notes": "rice", "date": "2024-05-02" }))
    );
}

#[tokio::test]
async fn password_reset_requires_matching_passwords() {
    let (router, transport) = app();
    let response = post_form(
        router,
        "/forgot-password/reset",
        "email=deb%40example.com&password=secret1&confirmPassword=secret2",
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains("Passwords do not match"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn full_page_and_fragment_share_a_route() {
    let (router, _) = app();
    let full = body_text(get(router.clone(), "/customers").await).await;
    assert!(full.contains("<!DOCTYPE html>"));

    let fragment = router
        .oneshot(
            Request::builder()
                .uri("/customers")
                .header("HX-Request", "true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let fragment = body_text(fragment).await;
    assert!(!fragment.contains("<!DOCTYPE html>"));
    assert!(fragment.contains("id='customers-list'"));
}
