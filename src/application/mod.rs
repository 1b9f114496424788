//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::checkout::{
    CheckoutError, CheckoutRedirects, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateProductCommand, CreateProductHandler,
};
pub use handlers::webhook::{
    default_handler_registry, CheckoutCompletedHandler, ProcessWebhookCommand,
    ProcessWebhookHandler, ProcessWebhookResult,
};
