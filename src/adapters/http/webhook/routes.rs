//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{receive_stripe_webhook, WebhookAppState};

/// Create the webhook router.
///
/// Webhooks carry no user authentication; each delivery is authenticated
/// by its signature.
///
/// # Routes
/// - `POST /stripe` - Receive Stripe webhooks
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new().route("/stripe", post(receive_stripe_webhook))
}

/// Create the webhook module router, mounted at `/api/webhooks`.
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new().nest("/api/webhooks", webhook_routes())
}
