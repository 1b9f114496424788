//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API.
//! Requests are form-encoded and authenticated with the secret API key via
//! HTTP basic auth.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateProductRequest, PaymentError,
    PaymentErrorCode, PaymentProvider, Product,
};

use super::api_types::{StripeCheckoutSession, StripeErrorBody, StripeProduct};

/// Default Stripe API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Stripe payment provider adapter.
///
/// Implements `PaymentProvider` for Stripe API integration.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// POSTs `params` form-encoded to `path` and parses a 2xx body as `T`.
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        operation: &'static str,
    ) -> Result<T, PaymentError> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(operation, error = %e, "Stripe request failed");
                PaymentError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let err = map_error_response(status.as_u16(), &error_text);
            tracing::error!(
                operation,
                status = status.as_u16(),
                code = %err.code,
                provider_code = err.provider_code.as_deref().unwrap_or(""),
                "Stripe API returned an error"
            );
            return Err(err);
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<Product, PaymentError> {
        let params = product_params(&request);
        let stripe_product: StripeProduct =
            self.post_form("/v1/products", &params, "create_product").await?;

        let product = map_product(stripe_product, request)?;
        tracing::info!(
            product_id = %product.id,
            price_id = %product.price_id,
            "Stripe product created"
        );
        Ok(product)
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = checkout_params(&request);
        let stripe_session: StripeCheckoutSession = self
            .post_form("/v1/checkout/sessions", &params, "create_checkout_session")
            .await?;

        let session = map_checkout_session(stripe_session)?;
        tracing::info!(session_id = %session.id, "Stripe checkout session created");
        Ok(session)
    }
}

/// Form parameters for creating a product with a default price.
fn product_params(request: &CreateProductRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("name", request.name.clone()),
        ("default_price_data[unit_amount]", request.unit_amount.to_string()),
        ("default_price_data[currency]", request.currency.to_string()),
    ];

    if let Some(description) = &request.description {
        params.push(("description", description.clone()));
    }

    params
}

/// Form parameters for a one-time payment checkout session.
fn checkout_params(request: &CreateCheckoutRequest) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_string()),
        ("line_items[0][price]", request.price_id.clone()),
        ("line_items[0][quantity]", request.quantity.to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
    ]
}

fn map_product(
    stripe_product: StripeProduct,
    request: CreateProductRequest,
) -> Result<Product, PaymentError> {
    let price_id = stripe_product
        .default_price
        .as_ref()
        .map(|price| price.id().to_string())
        .ok_or_else(|| PaymentError::provider("Stripe product has no default price"))?;

    Ok(Product {
        id: stripe_product.id,
        name: stripe_product.name,
        description: stripe_product.description.or(request.description),
        price_id,
        unit_amount: request.unit_amount,
        currency: request.currency,
    })
}

fn map_checkout_session(session: StripeCheckoutSession) -> Result<CheckoutSession, PaymentError> {
    let url = session
        .url
        .ok_or_else(|| PaymentError::provider("Stripe checkout session has no URL"))?;

    Ok(CheckoutSession {
        id: session.id,
        url,
        expires_at: session.expires_at,
    })
}

/// Maps a non-2xx Stripe response to a `PaymentError`.
fn map_error_response(status: u16, body: &str) -> PaymentError {
    let parsed = serde_json::from_str::<StripeErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.error.message.clone())
        .unwrap_or_else(|| format!("Stripe API error (HTTP {})", status));
    let provider_code = parsed
        .as_ref()
        .and_then(|b| b.error.code.clone().or_else(|| b.error.kind.clone()));

    let code = match status {
        401 | 403 => PaymentErrorCode::AuthenticationError,
        400 | 402 | 404 => PaymentErrorCode::InvalidRequest,
        429 => PaymentErrorCode::RateLimitExceeded,
        500..=599 => PaymentErrorCode::ProviderError,
        _ => PaymentErrorCode::Unknown,
    };

    let err = PaymentError::new(code, message);
    match provider_code {
        Some(provider_code) => err.with_provider_code(provider_code),
        None => err,
    }
}
