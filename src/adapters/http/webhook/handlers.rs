//! HTTP handler for inbound Stripe webhooks.
//!
//! The body is taken as raw bytes; it must reach the verifier exactly as
//! sent, so no JSON extractor runs before verification.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::{ProcessWebhookCommand, ProcessWebhookHandler};
use crate::domain::webhook::{HandlerRegistry, VerificationError, WebhookError, WebhookVerifier};

use super::dto::WebhookAck;

/// Name of the header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared, read-only state for the webhook endpoint.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: Arc<WebhookVerifier>,
    pub handlers: Arc<HandlerRegistry>,
}

impl WebhookAppState {
    pub fn new(verifier: WebhookVerifier, handlers: HandlerRegistry) -> Self {
        Self {
            verifier: Arc::new(verifier),
            handlers: Arc::new(handlers),
        }
    }

    pub fn process_webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(self.verifier.clone(), self.handlers.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/stripe - Receive a Stripe webhook delivery
///
/// Returns 200 once the event is verified and decoded, whatever the handler
/// outcome. Returns 400 for a missing or invalid signature, a stale
/// timestamp, or an undecodable payload.
pub async fn receive_stripe_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = match headers.get(SIGNATURE_HEADER) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| VerificationError::MalformedHeader("header is not visible ASCII"))
                .map_err(WebhookError::from)?
                .to_string(),
        ),
        None => None,
    };

    let cmd = ProcessWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    let result = state.process_webhook_handler().handle(cmd).await?;

    tracing::debug!(
        event_id = %result.event_id,
        event_type = %result.event_type,
        success = result.dispatch.is_success(),
        "Webhook acknowledged"
    );

    Ok((StatusCode::OK, Json(WebhookAck::received())))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook rejections to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(reason = self.0.kind(), error = %self.0, "Webhook rejected");
        (self.0.status_code(), self.0.to_string()).into_response()
    }
}
