//! ProcessWebhookHandler - verify, decode, and dispatch one delivery.

use std::sync::Arc;

use crate::domain::webhook::{
    decode, dispatch, DispatchResult, HandlerRegistry, WebhookError, WebhookVerifier,
};

/// Command carrying one raw webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    /// Raw request body, byte for byte.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value, if present.
    pub signature: Option<String>,
}

/// Result of an accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessWebhookResult {
    pub event_id: String,
    pub event_type: String,
    pub dispatch: DispatchResult,
}

/// Runs the verify → decode → dispatch pipeline.
///
/// Any error returned here rejects the delivery; once an event is decoded
/// the delivery is accepted regardless of the dispatch outcome.
pub struct ProcessWebhookHandler {
    verifier: Arc<WebhookVerifier>,
    registry: Arc<HandlerRegistry>,
}

impl ProcessWebhookHandler {
    pub fn new(verifier: Arc<WebhookVerifier>, registry: Arc<HandlerRegistry>) -> Self {
        Self { verifier, registry }
    }

    pub async fn handle(
        &self,
        cmd: ProcessWebhookCommand,
    ) -> Result<ProcessWebhookResult, WebhookError> {
        // 1. Authenticate the raw bytes
        let signature = cmd.signature.as_deref().ok_or(WebhookError::HeaderMissing)?;
        let verified = self.verifier.verify(&cmd.payload, signature)?;

        // 2. Decode the authenticated payload
        let event = decode(verified)?;
        tracing::debug!(
            event_id = %event.id(),
            event_type = %event.type_name(),
            "Webhook event verified"
        );

        // 3. Route to at most one handler
        let dispatch = dispatch(&event, &self.registry).await;

        Ok(ProcessWebhookResult {
            event_id: event.id().to_string(),
            event_type: event.type_name().to_string(),
            dispatch,
        })
    }
}
