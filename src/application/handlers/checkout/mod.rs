//! Checkout handlers.
//!
//! ## Commands
//! - Creating a product with a default price
//! - Creating a hosted checkout session

mod create_checkout_session;
mod create_product;
mod errors;

pub use create_checkout_session::{
    CheckoutRedirects, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
};
pub use create_product::{CreateProductCommand, CreateProductHandler};
pub use errors::CheckoutError;
