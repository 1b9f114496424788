//! CreateCheckoutSessionHandler - Command handler for starting hosted checkout.

use std::sync::Arc;

use crate::domain::checkout::CheckoutDraft;
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentProvider};

use super::CheckoutError;

/// Command to start a one-time payment checkout.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub price_id: String,
    /// Defaults to 1 when absent.
    pub quantity: Option<i64>,
}

/// Redirect targets applied to every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirects {
    pub success_url: String,
    pub cancel_url: String,
}

/// Handler for creating hosted checkout sessions.
///
/// Payment completion is observed later through the
/// `checkout.session.completed` webhook.
pub struct CreateCheckoutSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    redirects: CheckoutRedirects,
}

impl CreateCheckoutSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, redirects: CheckoutRedirects) -> Self {
        Self {
            payment_provider,
            redirects,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CheckoutSession, CheckoutError> {
        let draft = CheckoutDraft::new(&cmd.price_id, cmd.quantity)?;

        let request = CreateCheckoutRequest::from_draft(
            draft,
            self.redirects.success_url.clone(),
            self.redirects.cancel_url.clone(),
        );
        let session = self.payment_provider.create_checkout_session(request).await?;

        tracing::debug!(session_id = %session.id, "Checkout session ready");
        Ok(session)
    }
}
