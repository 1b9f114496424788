//! Adapters - Implementations of ports and inbound HTTP surfaces.
//!
//! - `http` - Axum routers for checkout and webhook endpoints
//! - `stripe` - Stripe REST API client and an in-memory mock

pub mod http;
pub mod stripe;
