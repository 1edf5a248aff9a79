//! Webhook round-trips through the full router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use tandoor_menu::MenuCatalog;
use tandoor_server::{app, AppState};

fn test_app() -> axum::Router {
    let catalog = MenuCatalog::load(None).expect("default menu");
    app(AppState::new(catalog))
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("valid request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("json body")
}

fn completion_payload(call_id: &str) -> Value {
    json!({
        "call_id": call_id,
        "status": "done",
        "transcript": [
            {"role": "agent", "message": "Welcome to Tandoor!"},
            {"role": "user", "message": "one butter chicken, spicy please"},
            {"role": "agent", "message": "Your final order is: one butter chicken with spicy, is that correct?"},
            {"role": "user", "message": "yes that's right"}
        ]
    })
}

#[tokio::test]
async fn health_check_returns_ok() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn post_call_extracts_an_order() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/webhooks/post-call", &completion_payload("call-1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["outcome"], "order");
    assert_eq!(json["items"], 1);
    assert_eq!(json["customer_confirmed"], true);

    // The order is now visible at /orders/latest.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/orders/latest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let order = body_json(response).await;
    assert_eq!(order["items"][0]["name"], "butter chicken");
    assert_eq!(order["items"][0]["modifiers"][0], "spice: spicy");
}

#[tokio::test]
async fn duplicate_call_ids_are_ignored() {
    let app = test_app();

    let first = app
        .clone()
        .oneshot(post_json("/webhooks/post-call", &completion_payload("call-dup")))
        .await
        .unwrap();
    assert_eq!(body_json(first).await["outcome"], "order");

    let second = app
        .oneshot(post_json("/webhooks/post-call", &completion_payload("call-dup")))
        .await
        .unwrap();
    assert_eq!(body_json(second).await["status"], "duplicate");
}

#[tokio::test]
async fn live_cart_then_completion_merges() {
    let app = test_app();

    let cart_response = app
        .clone()
        .oneshot(post_json(
            "/webhooks/live-cart",
            &json!({
                "call_id": "call-2",
                "items": [{"name": "butter chicken", "quantity": 1}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(cart_response).await["lines"], 1);

    let response = app
        .clone()
        .oneshot(post_json("/webhooks/post-call", &completion_payload("call-2")))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["outcome"], "order");
    assert_eq!(json["items"], 1);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/orders/latest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let order = body_json(response).await;
    assert_eq!(order["items"][0]["name"], "butter chicken");
    assert_eq!(order["items"][0]["quantity"], 1);
    assert_eq!(order["items"][0]["modifiers"][0], "spice: spicy");
}

#[tokio::test]
async fn malformed_transcript_is_a_no_order_not_an_error() {
    let response = test_app()
        .oneshot(post_json(
            "/webhooks/post-call",
            &json!({"call_id": "call-3", "transcript": "not an array"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["outcome"], "no_order");
    assert_eq!(json["reason"], "empty_transcript");
}

#[tokio::test]
async fn transcript_without_confirmation_reports_no_order() {
    let response = test_app()
        .oneshot(post_json(
            "/webhooks/post-call",
            &json!({
                "call_id": "call-4",
                "transcript": [
                    {"role": "agent", "message": "What can I get you?"},
                    {"role": "user", "message": "one samosa"}
                ]
            }),
        ))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["outcome"], "no_order");
    assert_eq!(json["reason"], "missing_confirmation");
}

#[tokio::test]
async fn unresolvable_cart_lines_store_nothing() {
    let response = test_app()
        .oneshot(post_json(
            "/webhooks/live-cart",
            &json!({
                "call_id": "call-5",
                "items": [{"name": "flying saucer", "quantity": 2}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["lines"], 0);
}

#[tokio::test]
async fn latest_order_is_404_before_any_call() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/orders/latest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn voice_route_answers_twiml() {
    let response = test_app()
        .oneshot(Request::builder().uri("/voice").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/xml")
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let twiml = String::from_utf8(body.to_vec()).unwrap();
    assert!(twiml.contains("<Redirect>"));
    assert!(twiml.contains("agent_id=agent_"));
}
