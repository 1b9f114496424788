//! Stripe REST API response types.
//!
//! Only the fields the adapter maps are declared; everything else in the
//! response body is ignored.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Catalog Objects
// ════════════════════════════════════════════════════════════════════════════════

/// Product object returned by `POST /v1/products`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeProduct {
    /// Product ID (prod_...).
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Default price, either an ID or an expanded price object.
    #[serde(default)]
    pub default_price: Option<StripePriceRef>,
}

/// A price reference that Stripe returns unexpanded (ID) or expanded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StripePriceRef {
    Id(String),
    Expanded(StripePrice),
}

impl StripePriceRef {
    pub fn id(&self) -> &str {
        match self {
            StripePriceRef::Id(id) => id,
            StripePriceRef::Expanded(price) => &price.id,
        }
    }
}

/// Price object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePrice {
    /// Price ID (price_...).
    pub id: String,

    #[serde(default)]
    pub unit_amount: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// Checkout session object returned by `POST /v1/checkout/sessions`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    /// Session ID (cs_...).
    pub id: String,

    /// Hosted checkout URL. Null once the session is complete or expired.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub expires_at: Option<i64>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    /// Error category (api_error, card_error, invalid_request_error, ...).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}
