//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `webhook` - Stripe webhook verification, decoding, and dispatch
//! - `checkout` - Product and checkout session values (amounts, currencies)

pub mod checkout;
pub mod webhook;
