//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Implementations create catalog entries and hosted checkout sessions;
//! inbound webhooks are handled separately by `domain::webhook`.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment provider
//! - **One-time payments**: Checkout sessions use a single price and quantity
//! - **Thin**: Each operation is one provider call

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::{CheckoutDraft, Currency, ProductDraft};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a product with a default one-time price.
    async fn create_product(&self, request: CreateProductRequest)
        -> Result<Product, PaymentError>;

    /// Create a hosted checkout session in one-time payment mode.
    ///
    /// Returns a URL for the customer to complete payment.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// Request to create a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    /// Display name.
    pub name: String,

    /// Optional description shown on the hosted page.
    pub description: Option<String>,

    /// Price in the smallest currency unit.
    pub unit_amount: i64,

    pub currency: Currency,
}

impl From<ProductDraft> for CreateProductRequest {
    fn from(draft: ProductDraft) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            unit_amount: draft.unit_amount,
            currency: draft.currency,
        }
    }
}

/// Product in the payment system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Provider's product ID.
    pub id: String,

    pub name: String,

    pub description: Option<String>,

    /// Provider's ID of the default price.
    pub price_id: String,

    pub unit_amount: i64,

    pub currency: Currency,
}

/// Request to create a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Provider's price ID.
    pub price_id: String,

    pub quantity: u32,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,
}

impl CreateCheckoutRequest {
    pub fn from_draft(
        draft: CheckoutDraft,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            price_id: draft.price_id,
            quantity: draft.quantity,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }
}

/// Checkout session for payment completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to complete checkout.
    pub url: String,

    /// When the session expires (Unix timestamp), if reported.
    pub expires_at: Option<i64>,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    /// Create a generic provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// The provider rejected the request parameters.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());

        assert!(!PaymentErrorCode::InvalidRequest.is_retryable());
        assert!(!PaymentErrorCode::AuthenticationError.is_retryable());
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::invalid_request("No such price: 'price_x'");
        assert!(err.to_string().contains("invalid_request"));
        assert!(err.to_string().contains("No such price"));
    }

    #[test]
    fn payment_error_with_provider_code() {
        let err = PaymentError::provider("boom").with_provider_code("api_error");
        assert_eq!(err.provider_code.as_deref(), Some("api_error"));
        assert!(!err.retryable);
    }

    #[test]
    fn create_checkout_request_from_draft() {
        let draft = CheckoutDraft::new("price_123", Some(2)).unwrap();

        let request = CreateCheckoutRequest::from_draft(
            draft,
            "https://shop.example/success",
            "https://shop.example/cancel",
        );

        assert_eq!(request.price_id, "price_123");
        assert_eq!(request.quantity, 2);
        assert_eq!(request.cancel_url, "https://shop.example/cancel");
    }
}
