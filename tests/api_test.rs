// tests/api_test.rs — HTTP-level flow through the axum router

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{product, stub_router};
use voicecart::api::{build_router, ApiState};
use voicecart::tts::TtsClient;

fn test_app() -> Router {
    let router = stub_router(vec![
        (
            "Flipkart",
            vec![
                product("Flipkart", "Running Shoes", Some(1499)),
                product("Flipkart", "Canvas Sneakers", Some(799)),
            ],
        ),
        ("Amazon", vec![product("Amazon", "Trail Shoes", Some(1899))]),
    ]);
    build_router(ApiState {
        router,
        // Unreachable on purpose: the TTS passthrough should surface as a
        // transport-level 500, not a panic.
        tts: TtsClient::new("http://127.0.0.1:1/tts"),
    })
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn send_get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn search_is_acknowledged_then_polled_to_completion() {
    let app = test_app();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/search",
        json!({ "query": "shoes under 2000", "session_id": "poll" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "processing");
    assert_eq!(body["session_id"], "poll");

    // The stub stores answer instantly; a short poll loop is plenty.
    let mut completed = Value::Null;
    for _ in 0..50 {
        let (_, body) = send_get(&app, "/api/search-status/poll").await;
        if body["status"] == "complete" {
            completed = body;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(completed["status"], "complete");
    assert_eq!(completed["total_found"], 3);
    assert_eq!(completed["current_index"], 0);
    assert!(completed["voice_response"]
        .as_str()
        .unwrap()
        .contains("Running Shoes"));
}

#[tokio::test]
async fn status_for_an_unknown_session_is_idle() {
    let app = test_app();
    let (status, body) = send_get(&app, "/api/search-status/ghost").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
}

#[tokio::test]
async fn voice_command_search_then_navigate() {
    let app = test_app();

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/voice-command",
        json!({ "command": "find shoes under 2000 rupees", "session_id": "voice" }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["current_index"], 0);

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/navigate",
        json!({ "command": "next", "session_id": "voice" }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["current_index"], 1);

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/navigate",
        json!({ "command": "sideways", "session_id": "voice" }),
    )
    .await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn cart_endpoints_round_trip() {
    let app = test_app();
    let widget = serde_json::to_value(product("Flipkart", "Widget A", Some(100))).unwrap();

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/cart/add",
        json!({ "product": widget, "session_id": "basket" }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["item_count"], 1);

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/cart/add",
        json!({ "product": widget, "session_id": "basket" }),
    )
    .await;
    assert_eq!(body["item_count"], 1);
    assert_eq!(body["total"], 200);
    assert_eq!(body["items"][0]["quantity"], 2);

    let (_, body) = send_get(&app, "/api/cart/items?session_id=basket").await;
    assert_eq!(body["total"], 200);

    // Exact-title removal; a near-miss title changes nothing.
    let (_, body) = send_json(
        &app,
        "POST",
        "/api/cart/remove",
        json!({ "item_title": "widget a", "session_id": "basket" }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["item_count"], 1);

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/cart/checkout",
        json!({ "session_id": "basket" }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["item_count"], 0);

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/cart/checkout",
        json!({ "session_id": "basket" }),
    )
    .await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn tts_failure_is_caught_at_the_transport_boundary() {
    let app = test_app();
    let (status, body) = send_get(&app, "/api/tts?text=hello").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["voice_response"]
        .as_str()
        .unwrap()
        .contains("something went wrong"));
}
