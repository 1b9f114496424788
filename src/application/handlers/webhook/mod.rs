//! Webhook handlers.
//!
//! - `ProcessWebhookHandler` runs one delivery through verify, decode, dispatch
//! - `CheckoutCompletedHandler` reacts to `checkout.session.completed`

mod checkout_completed;
mod process_webhook;

use std::sync::Arc;

use crate::domain::webhook::{EventKind, HandlerRegistry};

pub use checkout_completed::CheckoutCompletedHandler;
pub use process_webhook::{ProcessWebhookCommand, ProcessWebhookHandler, ProcessWebhookResult};

/// Registry wired at startup.
///
/// Other recognized kinds decode normally and are acknowledged without a
/// handler.
pub fn default_handler_registry() -> HandlerRegistry {
    HandlerRegistry::new().with_handler(
        EventKind::CheckoutSessionCompleted,
        Arc::new(CheckoutCompletedHandler::new()),
    )
}
