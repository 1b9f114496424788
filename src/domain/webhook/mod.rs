//! Stripe webhook ingestion: verify, decode, dispatch.
//!
//! # Module Structure
//!
//! - `signature` - HMAC-SHA256 signature verification and replay window
//! - `event` - Typed event decoding from verified payloads
//! - `dispatcher` - Handler registry and event dispatch
//! - `errors` - Error types for each stage
//!
//! The stages are ordered by type: [`decode`] accepts only a
//! [`VerifiedPayload`], which only the verifier can produce.

mod dispatcher;
mod errors;
mod event;
mod signature;

pub use dispatcher::{dispatch, DispatchResult, EventHandler, HandlerRegistry};
pub use errors::{DecodeError, HandlerError, VerificationError, WebhookError};
pub use event::{
    decode, CheckoutSessionRecord, CustomerDetails, EventKind, PaymentFailure,
    PaymentIntentRecord, PaymentStatus, ProviderEvent, VerifiedEvent,
};
pub use signature::{
    signature_header_for, verify, verify_at, SignatureHeader, VerifiedPayload, WebhookSecret,
    WebhookVerifier, DEFAULT_TOLERANCE_SECS,
};
