//! Stripe webhook event types.
//!
//! Decodes a [`VerifiedPayload`] into a closed set of typed events. Event
//! types outside the recognized set decode to [`ProviderEvent::Unhandled`] so
//! new Stripe event types never break ingestion.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::DecodeError;
use super::signature::VerifiedPayload;

/// Event kinds this service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Checkout session completed (payment may still be pending for async methods).
    CheckoutSessionCompleted,
    /// Checkout session expired before completion.
    CheckoutSessionExpired,
    /// Delayed payment for a completed session succeeded.
    CheckoutSessionAsyncPaymentSucceeded,
    /// Delayed payment for a completed session failed.
    CheckoutSessionAsyncPaymentFailed,
    /// Payment intent succeeded.
    PaymentIntentSucceeded,
    /// Payment intent failed.
    PaymentIntentPaymentFailed,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::CheckoutSessionCompleted,
        EventKind::CheckoutSessionExpired,
        EventKind::CheckoutSessionAsyncPaymentSucceeded,
        EventKind::CheckoutSessionAsyncPaymentFailed,
        EventKind::PaymentIntentSucceeded,
        EventKind::PaymentIntentPaymentFailed,
    ];

    /// Maps a Stripe event type string to a known kind.
    pub fn from_type(event_type: &str) -> Option<Self> {
        match event_type {
            "checkout.session.completed" => Some(Self::CheckoutSessionCompleted),
            "checkout.session.expired" => Some(Self::CheckoutSessionExpired),
            "checkout.session.async_payment_succeeded" => {
                Some(Self::CheckoutSessionAsyncPaymentSucceeded)
            }
            "checkout.session.async_payment_failed" => {
                Some(Self::CheckoutSessionAsyncPaymentFailed)
            }
            "payment_intent.succeeded" => Some(Self::PaymentIntentSucceeded),
            "payment_intent.payment_failed" => Some(Self::PaymentIntentPaymentFailed),
            _ => None,
        }
    }

    /// The Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::CheckoutSessionExpired => "checkout.session.expired",
            Self::CheckoutSessionAsyncPaymentSucceeded => {
                "checkout.session.async_payment_succeeded"
            }
            Self::CheckoutSessionAsyncPaymentFailed => "checkout.session.async_payment_failed",
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentPaymentFailed => "payment_intent.payment_failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::NoPaymentRequired => "no_payment_required",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stripe Checkout Session object, reduced to the fields we act on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheckoutSessionRecord {
    /// Session identifier (cs_...).
    pub id: String,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    /// Session status (open, complete, expired).
    #[serde(default)]
    pub status: Option<String>,

    /// Payment mode (payment, setup, subscription).
    #[serde(default)]
    pub mode: Option<String>,

    /// Total in the smallest currency unit.
    #[serde(default)]
    pub amount_total: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub customer: Option<String>,

    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    #[serde(default)]
    pub client_reference_id: Option<String>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSessionRecord {
    pub fn customer_email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|details| details.email.as_deref())
    }
}

/// Customer details collected during checkout.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Stripe PaymentIntent object, reduced to the fields we act on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentIntentRecord {
    /// Payment intent identifier (pi_...).
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub last_payment_error: Option<PaymentFailure>,
}

/// Last error attached to a failed payment intent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentFailure {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A decoded provider event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    CheckoutSessionCompleted(CheckoutSessionRecord),
    CheckoutSessionExpired(CheckoutSessionRecord),
    CheckoutSessionAsyncPaymentSucceeded(CheckoutSessionRecord),
    CheckoutSessionAsyncPaymentFailed(CheckoutSessionRecord),
    PaymentIntentSucceeded(PaymentIntentRecord),
    PaymentIntentPaymentFailed(PaymentIntentRecord),
    /// Any event type outside the recognized set, carrying its type string.
    Unhandled(String),
}

impl ProviderEvent {
    /// The recognized kind, or `None` for `Unhandled`.
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::CheckoutSessionCompleted(_) => Some(EventKind::CheckoutSessionCompleted),
            Self::CheckoutSessionExpired(_) => Some(EventKind::CheckoutSessionExpired),
            Self::CheckoutSessionAsyncPaymentSucceeded(_) => {
                Some(EventKind::CheckoutSessionAsyncPaymentSucceeded)
            }
            Self::CheckoutSessionAsyncPaymentFailed(_) => {
                Some(EventKind::CheckoutSessionAsyncPaymentFailed)
            }
            Self::PaymentIntentSucceeded(_) => Some(EventKind::PaymentIntentSucceeded),
            Self::PaymentIntentPaymentFailed(_) => Some(EventKind::PaymentIntentPaymentFailed),
            Self::Unhandled(_) => None,
        }
    }

    /// The Stripe event type string.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Unhandled(kind) => kind,
            other => other.kind().map(|kind| kind.as_str()).unwrap_or_default(),
        }
    }

    pub fn checkout_session(&self) -> Option<&CheckoutSessionRecord> {
        match self {
            Self::CheckoutSessionCompleted(session)
            | Self::CheckoutSessionExpired(session)
            | Self::CheckoutSessionAsyncPaymentSucceeded(session)
            | Self::CheckoutSessionAsyncPaymentFailed(session) => Some(session),
            _ => None,
        }
    }

    pub fn payment_intent(&self) -> Option<&PaymentIntentRecord> {
        match self {
            Self::PaymentIntentSucceeded(intent) | Self::PaymentIntentPaymentFailed(intent) => {
                Some(intent)
            }
            _ => None,
        }
    }

    fn from_object(kind: EventKind, object: Value) -> Result<Self, DecodeError> {
        let mismatch = |_| DecodeError::UnrecognizedShape("object does not match event type");
        let event = match kind {
            EventKind::CheckoutSessionCompleted => {
                Self::CheckoutSessionCompleted(serde_json::from_value(object).map_err(mismatch)?)
            }
            EventKind::CheckoutSessionExpired => {
                Self::CheckoutSessionExpired(serde_json::from_value(object).map_err(mismatch)?)
            }
            EventKind::CheckoutSessionAsyncPaymentSucceeded => {
                Self::CheckoutSessionAsyncPaymentSucceeded(
                    serde_json::from_value(object).map_err(mismatch)?,
                )
            }
            EventKind::CheckoutSessionAsyncPaymentFailed => {
                Self::CheckoutSessionAsyncPaymentFailed(
                    serde_json::from_value(object).map_err(mismatch)?,
                )
            }
            EventKind::PaymentIntentSucceeded => {
                Self::PaymentIntentSucceeded(serde_json::from_value(object).map_err(mismatch)?)
            }
            EventKind::PaymentIntentPaymentFailed => {
                Self::PaymentIntentPaymentFailed(serde_json::from_value(object).map_err(mismatch)?)
            }
        };
        Ok(event)
    }
}

/// A typed event decoded from an authenticated payload.
///
/// Only [`decode`] constructs this type, and it requires a
/// [`VerifiedPayload`].
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedEvent {
    id: String,
    created: i64,
    livemode: bool,
    event: ProviderEvent,
}

impl VerifiedEvent {
    /// Stripe event identifier (evt_...).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time as a unix timestamp.
    pub fn created(&self) -> i64 {
        self.created
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created, 0)
    }

    pub fn livemode(&self) -> bool {
        self.livemode
    }

    pub fn event(&self) -> &ProviderEvent {
        &self.event
    }

    pub fn kind(&self) -> Option<EventKind> {
        self.event.kind()
    }

    pub fn type_name(&self) -> &str {
        self.event.type_name()
    }
}

/// Decodes a verified payload into a typed event.
///
/// Recognized types must carry a string `id`, well-typed `created` and
/// `livemode` when present, and a `data.object` of the matching shape. Any
/// other type decodes as [`ProviderEvent::Unhandled`] with envelope fields
/// read leniently.
///
/// # Errors
///
/// Returns `DecodeError::UnrecognizedShape` when the payload is not JSON,
/// has no string `type`, or when a recognized type has a malformed
/// envelope or object.
pub fn decode(payload: VerifiedPayload) -> Result<VerifiedEvent, DecodeError> {
    let value: Value = serde_json::from_slice(payload.as_bytes())
        .map_err(|_| DecodeError::UnrecognizedShape("payload is not valid JSON"))?;

    let event_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::UnrecognizedShape("missing event type"))?
        .to_owned();

    let Some(kind) = EventKind::from_type(&event_type) else {
        return Ok(VerifiedEvent {
            id: value.get("id").and_then(Value::as_str).unwrap_or_default().to_owned(),
            created: value.get("created").and_then(Value::as_i64).unwrap_or_default(),
            livemode: value.get("livemode").and_then(Value::as_bool).unwrap_or_default(),
            event: ProviderEvent::Unhandled(event_type),
        });
    };

    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or(DecodeError::UnrecognizedShape("missing event id"))?
        .to_owned();
    let created = match value.get("created") {
        None | Some(Value::Null) => 0,
        Some(created) => created
            .as_i64()
            .ok_or(DecodeError::UnrecognizedShape("created is not an integer"))?,
    };
    let livemode = match value.get("livemode") {
        None | Some(Value::Null) => false,
        Some(livemode) => livemode
            .as_bool()
            .ok_or(DecodeError::UnrecognizedShape("livemode is not a boolean"))?,
    };
    let object = value
        .get("data")
        .and_then(|data| data.get("object"))
        .cloned()
        .ok_or(DecodeError::UnrecognizedShape("missing data.object"))?;

    Ok(VerifiedEvent {
        id,
        created,
        livemode,
        event: ProviderEvent::from_object(kind, object)?,
    })
}
