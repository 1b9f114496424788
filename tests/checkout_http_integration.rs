//! Integration tests for the assembled application router.
//!
//! Uses `MockPaymentProvider` in place of Stripe and checks:
//! 1. Product and checkout endpoints map to provider calls
//! 2. Error responses carry stable codes
//! 3. The root banner and middleware stack are wired

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use checkout_demo::adapters::http::{app_router, AppState, ROOT_BANNER};
use checkout_demo::adapters::stripe::MockPaymentProvider;
use checkout_demo::config::{AppConfig, PaymentConfig, ServerConfig};
use checkout_demo::ports::PaymentError;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(mock: &MockPaymentProvider) -> Router {
    let mut payment = PaymentConfig::new("sk_test_integration", "whsec_integration");
    payment.checkout_success_url = "https://shop.example/thanks".to_string();
    payment.checkout_cancel_url = "https://shop.example/cart".to_string();
    let config = AppConfig {
        server: ServerConfig::default(),
        payment,
    };
    config.validate().unwrap();

    let state = AppState::from_config(&config, Arc::new(mock.clone())).unwrap();
    app_router(state)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn create_product_returns_product_with_price() {
    let mock = MockPaymentProvider::new();

    let (status, body) = post_json(
        app(&mock),
        "/api/products",
        json!({ "name": "Sticker pack", "unit_amount": 500, "currency": "EUR" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Sticker pack");
    assert_eq!(body["currency"], "eur");
    assert!(body["price_id"].as_str().unwrap().starts_with("price_"));
    assert_eq!(mock.call_count("create_product"), 1);
}

#[tokio::test]
async fn invalid_currency_is_validation_failure() {
    let mock = MockPaymentProvider::new();

    let (status, body) = post_json(
        app(&mock),
        "/api/products",
        json!({ "name": "Sticker pack", "unit_amount": 500, "currency": "euro" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "currency");
    assert!(!mock.was_called("create_product"));
}

// =============================================================================
// Checkout Sessions
// =============================================================================

#[tokio::test]
async fn checkout_session_uses_configured_redirects() {
    let mock = MockPaymentProvider::new();

    let (status, body) = post_json(
        app(&mock),
        "/api/checkout-sessions",
        json!({ "price_id": "price_123", "quantity": 3 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_str().unwrap().starts_with("cs_"));
    let call = &mock.calls()[0];
    assert_eq!(call.args, vec![
        "price_123".to_string(),
        "3".to_string(),
        "https://shop.example/thanks".to_string(),
        "https://shop.example/cart".to_string(),
    ]);
}

#[tokio::test]
async fn provider_outage_is_service_unavailable() {
    let mock = MockPaymentProvider::new();
    mock.set_error(PaymentError::network("connection refused"));

    let (status, body) = post_json(
        app(&mock),
        "/api/checkout-sessions",
        json!({ "price_id": "price_123" }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_code"], "PAYMENT_PROVIDER_ERROR");
}

// =============================================================================
// Root
// =============================================================================

#[tokio::test]
async fn root_banner_is_served() {
    let mock = MockPaymentProvider::new();

    let response = app(&mock)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], ROOT_BANNER.as_bytes());
}

#[tokio::test]
async fn webhook_route_is_mounted_on_app_router() {
    let mock = MockPaymentProvider::new();

    let (status, _) = post_json(app(&mock), "/api/webhooks/stripe", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
