//! HTTP adapters - REST API implementations.
//!
//! Each module has its own router and state; [`app_router`] merges them and
//! applies the shared middleware stack.

pub mod checkout;
pub mod webhook;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::{default_handler_registry, CheckoutRedirects};
use crate::config::{AppConfig, ValidationError};
use crate::domain::webhook::{WebhookSecret, WebhookVerifier};
use crate::ports::PaymentProvider;

pub use checkout::{checkout_router, CheckoutAppState, CheckoutSettings};
pub use webhook::{webhook_router, WebhookAppState};

/// Banner returned by `GET /`.
pub const ROOT_BANNER: &str = "checkout-demo api server is running";

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    /// Allowed origins; empty mirrors the request origin.
    pub cors_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Everything the HTTP surface needs.
#[derive(Clone)]
pub struct AppState {
    pub checkout: CheckoutAppState,
    pub webhook: WebhookAppState,
    pub http: HttpSettings,
}

impl AppState {
    /// Wires the HTTP state from validated configuration.
    pub fn from_config(
        config: &AppConfig,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Result<Self, ValidationError> {
        let payment = &config.payment;

        let verifier = WebhookVerifier::new(
            Arc::new(WebhookSecret::from(payment.stripe_webhook_secret.clone())),
            payment.webhook_tolerance_secs,
        );
        let settings = CheckoutSettings {
            default_currency: payment.currency()?,
            redirects: CheckoutRedirects {
                success_url: payment.checkout_success_url.clone(),
                cancel_url: payment.checkout_cancel_url.clone(),
            },
        };

        Ok(Self {
            checkout: CheckoutAppState::new(payment_provider, settings),
            webhook: WebhookAppState::new(verifier, default_handler_registry()),
            http: HttpSettings {
                request_timeout: config.server.request_timeout(),
                cors_origins: config.server.cors_origins_list(),
            },
        })
    }
}

/// GET / - Liveness banner
pub async fn root() -> &'static str {
    ROOT_BANNER
}

/// Builds the complete application router.
pub fn app_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.http.cors_origins);

    Router::new()
        .route("/", get(root))
        .merge(checkout_router().with_state(state.checkout))
        .merge(webhook_router().with_state(state.webhook))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors)
                .layer(TimeoutLayer::new(state.http.request_timeout)),
        )
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
