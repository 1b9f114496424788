//! HTTP adapter for product and checkout endpoints.
//!
//! - `POST /api/products` - Create a product with a default price
//! - `POST /api/checkout-sessions` - Start a hosted checkout

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{CheckoutApiError, CheckoutAppState, CheckoutSettings};
pub use routes::checkout_router;
