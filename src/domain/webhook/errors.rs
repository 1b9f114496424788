//! Webhook error types for Stripe webhook handling.
//!
//! Every failure before dispatch is terminal for the request and maps to
//! HTTP 400. Messages are stable and never carry the signing secret, the
//! signature value, or any part of the request body.

use axum::http::StatusCode;
use thiserror::Error;

/// Reasons a signed payload is rejected by the signature verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The signature header could not be parsed.
    #[error("malformed signature header: {0}")]
    MalformedHeader(&'static str),

    /// No v1 signature matches the payload.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The signed timestamp is outside the tolerance window.
    #[error("timestamp outside tolerance window")]
    Stale,
}

/// Reasons a verified payload cannot be turned into an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unrecognized event shape: {0}")]
    UnrecognizedShape(&'static str),
}

/// Errors returned by event handlers.
///
/// These never reach the HTTP layer; the dispatcher logs them and reports
/// `DispatchResult::HandlerFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler was registered for a kind whose payload it cannot process.
    #[error("unexpected event type: {0}")]
    UnexpectedEvent(String),

    /// A downstream operation failed.
    #[error("handler failed: {0}")]
    Failed(String),
}

/// Errors that reject an inbound webhook request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// The request carried no signature header.
    #[error("missing Stripe-Signature header")]
    HeaderMissing,

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl WebhookError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookError::HeaderMissing => "header_missing",
            WebhookError::Verification(VerificationError::MalformedHeader(_)) => {
                "malformed_header"
            }
            WebhookError::Verification(VerificationError::SignatureMismatch) => {
                "signature_mismatch"
            }
            WebhookError::Verification(VerificationError::Stale) => "stale",
            WebhookError::Decode(DecodeError::UnrecognizedShape(_)) => "unrecognized_shape",
        }
    }

    /// Maps the error to an HTTP status code.
    ///
    /// All rejections are client errors. A 4xx tells Stripe the delivery was
    /// refused; its own retry schedule is the only retry layer.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
