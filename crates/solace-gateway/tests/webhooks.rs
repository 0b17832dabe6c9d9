// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook routes driven through the full router with `tower::ServiceExt`.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
use solace_core::{ConversationRepository, ConversationState, MessageRepository, MessageStatus};
use solace_gateway::{GatewayState, HealthState, SignatureState, router};
use solace_sms::{SIGNATURE_HEADER, TwilioSignatureVerifier, compute_signature, parse_form_params};
use solace_test_utils::TestHarness;
use tower::ServiceExt;

const DANA: &str = "+15550000002";
const PUBLIC_BASE: &str = "https://solace.example.com";

fn gateway(h: &TestHarness, signatures: SignatureState) -> Router {
    router(
        GatewayState {
            ingestion: h.ingestion.clone(),
            reconciler: h.reconciler.clone(),
            health: HealthState::default(),
        },
        signatures,
    )
}

fn form_post(path: &str, body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn inbound_form(from: &str, body: &str, sid: &str) -> String {
    format!(
        "From={}&To=%2B15550000001&Body={}&SmsSid={sid}&SmsStatus=received",
        from.replace('+', "%2B"),
        body.replace(' ', "+")
    )
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let h = TestHarness::builder().build().await.unwrap();
    let response = gateway(&h, SignatureState::disabled())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn inbound_webhook_records_and_queues() {
    let h = TestHarness::builder().build().await.unwrap();
    h.add_user("Dana", DANA).await.unwrap();

    let response = gateway(&h, SignatureState::disabled())
        .oneshot(form_post("/sms/inbound", &inbound_form(DANA, "Hello there", "SMin1"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/xml");
    assert!(body_text(response).await.contains("<Response></Response>"));

    let stored = h
        .store
        .storage
        .find_by_reference("SMin1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.body, "Hello there");
    assert_eq!(stored.status, MessageStatus::Received);
    assert_eq!(h.drain_queue().await.unwrap(), 1);
}

#[tokio::test]
async fn inbound_webhook_maps_errors_to_status_codes() {
    let h = TestHarness::builder().build().await.unwrap();
    h.add_user("Dana", DANA).await.unwrap();
    let app = gateway(&h, SignatureState::disabled());

    let unknown = app
        .clone()
        .oneshot(form_post(
            "/sms/inbound",
            &inbound_form("+15559999999", "Hi", "SMin2"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let empty = app
        .oneshot(form_post("/sms/inbound", &inbound_form(DANA, "", "SMin3"), None))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(empty).await.contains("missing Body"));

    assert_eq!(h.drain_queue().await.unwrap(), 0);
}

#[tokio::test]
async fn status_webhook_closes_conversation() {
    let h = TestHarness::builder().build().await.unwrap();
    h.add_user("Dana", DANA).await.unwrap();
    let app = gateway(&h, SignatureState::disabled());

    let inbound = app
        .clone()
        .oneshot(form_post("/sms/inbound", &inbound_form(DANA, "Hello", "SMin1"), None))
        .await
        .unwrap();
    assert_eq!(inbound.status(), StatusCode::CREATED);
    h.drain_queue().await.unwrap();

    let reference = h.transport.sent().await[0].delivery_id.clone();
    let callback = format!("MessageSid={reference}&MessageStatus=delivered&SmsStatus=delivered");
    let response = app
        .oneshot(form_post("/sms/status", &callback, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reply = h
        .store
        .storage
        .find_by_reference(&reference)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply.status, MessageStatus::Delivered);
    let conversation = h
        .store
        .storage
        .get_conversation(reply.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conversation.state(), ConversationState::Closed);
}

#[tokio::test]
async fn status_webhook_for_unknown_reference_is_not_found() {
    let h = TestHarness::builder().build().await.unwrap();
    let response = gateway(&h, SignatureState::disabled())
        .oneshot(form_post(
            "/sms/status",
            "MessageSid=SMnope&MessageStatus=delivered",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_webhook_without_status_is_bad_request() {
    let h = TestHarness::builder().build().await.unwrap();
    let response = gateway(&h, SignatureState::disabled())
        .oneshot(form_post("/sms/status", "MessageSid=SM1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signed_routes_require_valid_signature() {
    let h = TestHarness::builder().build().await.unwrap();
    h.add_user("Dana", DANA).await.unwrap();
    let app = gateway(
        &h,
        SignatureState::new(
            Arc::new(TwilioSignatureVerifier::new("auth-token")),
            Some(PUBLIC_BASE.to_string()),
        ),
    );

    let form = inbound_form(DANA, "Hello", "SMin1");
    let params = parse_form_params(form.as_bytes()).unwrap();
    let url = format!("{PUBLIC_BASE}/sms/inbound");

    let unsigned = app
        .clone()
        .oneshot(form_post("/sms/inbound", &form, None))
        .await
        .unwrap();
    assert_eq!(unsigned.status(), StatusCode::FORBIDDEN);

    let forged = compute_signature("wrong-token", &url, &params);
    let rejected = app
        .clone()
        .oneshot(form_post("/sms/inbound", &form, Some(&forged)))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
    assert!(
        h.store
            .storage
            .find_by_reference("SMin1")
            .await
            .unwrap()
            .is_none()
    );

    let signature = compute_signature("auth-token", &url, &params);
    let accepted = app
        .clone()
        .oneshot(form_post("/sms/inbound", &form, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::CREATED);

    let health = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
