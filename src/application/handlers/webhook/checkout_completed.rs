//! CheckoutCompletedHandler - reacts to finished checkout sessions.

use async_trait::async_trait;

use crate::domain::webhook::{EventHandler, HandlerError, PaymentStatus, VerifiedEvent};

/// Records completed checkout sessions.
///
/// A completed session with `payment_status = unpaid` is still awaiting an
/// asynchronous payment method; fulfilment waits for
/// `checkout.session.async_payment_succeeded`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckoutCompletedHandler;

impl CheckoutCompletedHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventHandler for CheckoutCompletedHandler {
    fn name(&self) -> &'static str {
        "checkout_completed"
    }

    async fn handle(&self, event: &VerifiedEvent) -> Result<(), HandlerError> {
        let session = event
            .event()
            .checkout_session()
            .ok_or_else(|| HandlerError::UnexpectedEvent(event.type_name().to_string()))?;

        match session.payment_status {
            PaymentStatus::Paid | PaymentStatus::NoPaymentRequired => {
                tracing::info!(
                    event_id = %event.id(),
                    session_id = %session.id,
                    payment_status = %session.payment_status,
                    amount_total = session.amount_total,
                    currency = session.currency.as_deref(),
                    livemode = event.livemode(),
                    "Checkout session completed"
                );
            }
            PaymentStatus::Unpaid | PaymentStatus::Unknown => {
                tracing::info!(
                    event_id = %event.id(),
                    session_id = %session.id,
                    payment_status = %session.payment_status,
                    "Checkout session completed, payment pending"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::test_support::verified_event;
    use serde_json::json;

    #[tokio::test]
    async fn accepts_paid_session() {
        let event = verified_event(&json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_1",
                "payment_status": "paid",
                "amount_total": 2000,
                "currency": "usd"
            } }
        }));

        let result = CheckoutCompletedHandler::new().handle(&event).await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn accepts_pending_session() {
        let event = verified_event(&json!({
            "id": "evt_2",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_2", "payment_status": "unpaid" } }
        }));

        let result = CheckoutCompletedHandler::new().handle(&event).await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn rejects_non_checkout_event() {
        let event = verified_event(&json!({
            "id": "evt_3",
            "type": "payment_intent.succeeded",
            "data": { "object": {
                "id": "pi_1",
                "amount": 100,
                "currency": "usd",
                "status": "succeeded"
            } }
        }));

        let result = CheckoutCompletedHandler::new().handle(&event).await;

        assert_eq!(
            result,
            Err(HandlerError::UnexpectedEvent(
                "payment_intent.succeeded".to_string()
            ))
        );
    }
}
