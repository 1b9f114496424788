//! Checkout Demo - payment integration backend
//!
//! Creates products and hosted checkout sessions through Stripe and ingests
//! Stripe webhooks through a verify, decode, dispatch pipeline.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
