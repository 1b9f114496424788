//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration:
//! - Products with a default one-time price
//! - Hosted checkout sessions in payment mode
//!
//! Inbound webhook verification lives in `domain::webhook`; this adapter
//! only makes outbound API calls.

mod api_types;
mod mock_payment_provider;
mod stripe_adapter;

pub use api_types::{StripeCheckoutSession, StripePrice, StripePriceRef, StripeProduct};
pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter, DEFAULT_API_BASE_URL};
