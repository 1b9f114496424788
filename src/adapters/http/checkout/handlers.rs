//! HTTP handlers for product and checkout endpoints.
//!
//! These handlers connect Axum routes to the checkout command handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{
    CheckoutError, CheckoutRedirects, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateProductCommand, CreateProductHandler,
};
use crate::domain::checkout::Currency;
use crate::ports::{PaymentErrorCode, PaymentProvider};

use super::dto::{
    CheckoutSessionResponse, ErrorResponse, NewCheckoutSessionRequest, NewProductRequest,
    ProductResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Fixed checkout settings taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    pub default_currency: Currency,
    pub redirects: CheckoutRedirects,
}

/// Shared state for checkout endpoints.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub settings: Arc<CheckoutSettings>,
}

impl CheckoutAppState {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, settings: CheckoutSettings) -> Self {
        Self {
            payment_provider,
            settings: Arc::new(settings),
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn create_product_handler(&self) -> CreateProductHandler {
        CreateProductHandler::new(
            self.payment_provider.clone(),
            self.settings.default_currency.clone(),
        )
    }

    pub fn create_checkout_session_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.payment_provider.clone(),
            self.settings.redirects.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/products - Create a product with a default price
pub async fn create_product(
    State(state): State<CheckoutAppState>,
    Json(request): Json<NewProductRequest>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let cmd = CreateProductCommand {
        name: request.name,
        description: request.description,
        unit_amount: request.unit_amount,
        currency: request.currency,
    };

    let product = state.create_product_handler().handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

/// POST /api/checkout-sessions - Start a hosted checkout
pub async fn create_checkout_session(
    State(state): State<CheckoutAppState>,
    Json(request): Json<NewCheckoutSessionRequest>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let cmd = CreateCheckoutSessionCommand {
        price_id: request.price_id,
        quantity: request.quantity,
    };

    let session = state.create_checkout_session_handler().handle(cmd).await?;

    Ok(Json(CheckoutSessionResponse::from(session)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts checkout errors to HTTP responses.
#[derive(Debug)]
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self.0 {
            CheckoutError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(
                    "VALIDATION_FAILED",
                    err.to_string(),
                    serde_json::json!({ "field": err.field() }),
                ),
            ),
            CheckoutError::Payment(err) => {
                tracing::error!(
                    code = %err.code,
                    provider_code = err.provider_code.as_deref().unwrap_or(""),
                    error = %err.message,
                    "Payment provider call failed"
                );
                let status = match err.code {
                    PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    _ => StatusCode::BAD_GATEWAY,
                };
                (
                    status,
                    ErrorResponse::new("PAYMENT_PROVIDER_ERROR", err.message.clone()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
