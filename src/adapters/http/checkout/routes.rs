//! Axum router configuration for product and checkout endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_checkout_session, create_product, CheckoutAppState};

/// Create the checkout API router, mounted at `/api`.
///
/// # Routes
/// - `POST /api/products` - Create a product with a default price
/// - `POST /api/checkout-sessions` - Start a hosted checkout
pub fn checkout_router() -> Router<CheckoutAppState> {
    Router::new()
        .route("/api/products", post(create_product))
        .route("/api/checkout-sessions", post(create_checkout_session))
}
