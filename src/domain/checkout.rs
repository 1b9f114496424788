//! Value objects for products and checkout sessions.
//!
//! Inputs from the HTTP layer are validated here before any call reaches
//! the payment provider.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Field '{field}' must be at least {min}, got {actual}")]
    TooSmall {
        field: &'static str,
        min: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::TooSmall { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// ISO 4217 currency code, stored lowercase as Stripe expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::EmptyField { field: "currency" });
        }
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidFormat {
                field: "currency",
                reason: "expected a three-letter code",
            });
        }
        Ok(Self(code.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated product input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit.
    pub unit_amount: i64,
    pub currency: Currency,
}

impl ProductDraft {
    pub fn new(
        name: &str,
        description: Option<&str>,
        unit_amount: i64,
        currency: Currency,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if unit_amount < 1 {
            return Err(ValidationError::TooSmall {
                field: "unit_amount",
                min: 1,
                actual: unit_amount,
            });
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            description,
            unit_amount,
            currency,
        })
    }
}

/// Validated checkout input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDraft {
    pub price_id: String,
    pub quantity: u32,
}

impl CheckoutDraft {
    pub fn new(price_id: &str, quantity: Option<i64>) -> Result<Self, ValidationError> {
        let price_id = price_id.trim();
        if price_id.is_empty() {
            return Err(ValidationError::EmptyField { field: "price_id" });
        }
        let quantity = quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(ValidationError::TooSmall {
                field: "quantity",
                min: 1,
                actual: quantity,
            });
        }
        let quantity = u32::try_from(quantity).map_err(|_| ValidationError::InvalidFormat {
            field: "quantity",
            reason: "too large",
        })?;

        Ok(Self {
            price_id: price_id.to_string(),
            quantity,
        })
    }
}
