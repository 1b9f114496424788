//! Errors for catalog and checkout commands.

use thiserror::Error;

use crate::domain::checkout::ValidationError;
use crate::ports::PaymentError;

/// Failure of a checkout command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The request failed validation; nothing was sent to the provider.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The payment provider rejected or failed the call.
    #[error("payment provider error: {0}")]
    Payment(#[from] PaymentError),
}
