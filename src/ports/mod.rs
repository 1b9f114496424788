//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - Catalog and hosted checkout operations

mod payment_provider;

pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, CreateProductRequest, PaymentError,
    PaymentErrorCode, PaymentProvider, Product,
};
