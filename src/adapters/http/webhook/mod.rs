//! HTTP adapter for webhook endpoints.
//!
//! - `POST /api/webhooks/stripe` - Verify, decode, and dispatch a Stripe event

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::WebhookAck;
pub use handlers::{receive_stripe_webhook, WebhookApiError, WebhookAppState, SIGNATURE_HEADER};
pub use routes::{webhook_router, webhook_routes};
