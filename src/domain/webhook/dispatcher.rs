//! Event dispatch - routes verified events to registered handlers.
//!
//! ## Design
//!
//! The registry is built once at startup and never mutated afterwards, so
//! it can be shared across concurrent requests behind an `Arc` without
//! locking. Dispatch never returns an error: unknown kinds are skipped, and
//! handler errors (including panics) are logged and reported as
//! [`DispatchResult::HandlerFailed`]. The webhook endpoint acknowledges all
//! three outcomes with 200.

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;

use super::errors::HandlerError;
use super::event::{EventKind, VerifiedEvent};

/// Handler for one or more event kinds.
///
/// Handlers run inline with the webhook request and must not block the
/// executor.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Stable name used in logs and dispatch results.
    fn name(&self) -> &'static str;

    /// Handles the event.
    async fn handle(&self, event: &VerifiedEvent) -> Result<(), HandlerError>;
}

/// Immutable mapping from event kind to handler.
///
/// At most one handler per kind; registering a kind twice replaces the
/// earlier handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EventKind, Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`.
    pub fn with_handler(mut self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn get(&self, kind: EventKind) -> Option<&Arc<dyn EventHandler>> {
        self.handlers.get(&kind)
    }

    /// Registered kinds in declaration order.
    pub fn registered_kinds(&self) -> Vec<EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(|kind| self.handlers.contains_key(kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<(&'static str, &'static str)> = self
            .registered_kinds()
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|h| (kind.as_str(), h.name())))
            .collect();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &entries)
            .finish()
    }
}

/// Outcome of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// A handler ran and returned `Ok`.
    Handled { handler: &'static str },
    /// No handler is registered for the event's kind (or the kind is unknown).
    Skipped { event_type: String },
    /// The handler returned an error or panicked.
    HandlerFailed {
        handler: &'static str,
        reason: String,
    },
}

impl DispatchResult {
    /// True unless a handler failed. Skipped events count as success.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            DispatchResult::Handled { .. } | DispatchResult::Skipped { .. }
        )
    }
}

/// Invokes at most one handler for `event`.
pub async fn dispatch(event: &VerifiedEvent, registry: &HandlerRegistry) -> DispatchResult {
    let handler = match event.kind().and_then(|kind| registry.get(kind)) {
        Some(handler) => handler,
        None => {
            tracing::info!(
                event_id = %event.id(),
                event_type = %event.type_name(),
                "No handler registered, acknowledging"
            );
            return DispatchResult::Skipped {
                event_type: event.type_name().to_string(),
            };
        }
    };

    let name = handler.name();
    let outcome = AssertUnwindSafe(handler.handle(event)).catch_unwind().await;

    match outcome {
        Ok(Ok(())) => {
            tracing::info!(
                event_id = %event.id(),
                event_type = %event.type_name(),
                handler = name,
                "Webhook event handled"
            );
            DispatchResult::Handled { handler: name }
        }
        Ok(Err(err)) => {
            tracing::error!(
                event_id = %event.id(),
                event_type = %event.type_name(),
                handler = name,
                error = %err,
                "Webhook handler failed"
            );
            DispatchResult::HandlerFailed {
                handler: name,
                reason: err.to_string(),
            }
        }
        Err(_) => {
            tracing::error!(
                event_id = %event.id(),
                event_type = %event.type_name(),
                handler = name,
                "Webhook handler panicked"
            );
            DispatchResult::HandlerFailed {
                handler: name,
                reason: "handler panicked".to_string(),
            }
        }
    }
}
