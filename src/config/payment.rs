//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::checkout::Currency;
use crate::domain::webhook::DEFAULT_TOLERANCE_SECS;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: SecretString,

    /// Allowed skew between the signed timestamp and server time
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,

    /// Stripe API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Currency used when a product request omits one
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Redirect after successful checkout
    #[serde(default = "default_success_url")]
    pub checkout_success_url: String,

    /// Redirect after canceled checkout
    #[serde(default = "default_cancel_url")]
    pub checkout_cancel_url: String,
}

impl PaymentConfig {
    /// Config with the given secrets and defaults for everything else.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            stripe_api_key: SecretString::new(api_key.into()),
            stripe_webhook_secret: SecretString::new(webhook_secret.into()),
            webhook_tolerance_secs: default_webhook_tolerance(),
            api_base_url: default_api_base_url(),
            default_currency: default_currency(),
            checkout_success_url: default_success_url(),
            checkout_cancel_url: default_cancel_url(),
        }
    }

    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Parsed default currency.
    pub fn currency(&self) -> Result<Currency, ValidationError> {
        Currency::parse(&self.default_currency).map_err(|_| ValidationError::InvalidCurrency)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Verify key prefixes for safety
        if !api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if !(1..=3600).contains(&self.webhook_tolerance_secs) {
            return Err(ValidationError::InvalidWebhookTolerance);
        }

        self.currency()?;

        for (name, url) in [
            ("api_base_url", &self.api_base_url),
            ("checkout_success_url", &self.checkout_success_url),
            ("checkout_cancel_url", &self.checkout_cancel_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ValidationError::InvalidUrl(name));
            }
        }

        Ok(())
    }
}

fn default_webhook_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_success_url() -> String {
    "http://localhost:5173/success?session_id={CHECKOUT_SESSION_ID}".to_string()
}

fn default_cancel_url() -> String {
    "http://localhost:5173/cancel".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PaymentConfig {
        PaymentConfig::new("sk_test_abcd1234", "whsec_xyz789")
    }

    #[test]
    fn test_defaults() {
        let config = valid_config();
        assert_eq!(config.webhook_tolerance_secs, 300);
        assert_eq!(config.api_base_url, "https://api.stripe.com");
        assert_eq!(config.currency().unwrap().as_str(), "usd");
    }

    #[test]
    fn test_is_test_mode() {
        let config = valid_config();
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn test_is_live_mode() {
        let config = PaymentConfig::new("sk_live_xxx", "whsec_xxx");
        assert!(config.is_live_mode());
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_validation_missing_api_key() {
        let config = PaymentConfig::new("", "whsec_xxx");
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STRIPE_API_KEY"))
        );
    }

    #[test]
    fn test_validation_missing_webhook_secret() {
        let config = PaymentConfig::new("sk_test_xxx", "");
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"))
        );
    }

    #[test]
    fn test_validation_invalid_api_key_prefix() {
        let config = PaymentConfig::new("pk_test_xxx", "whsec_xxx"); // Publishable key
        assert_eq!(config.validate(), Err(ValidationError::InvalidStripeKey));
    }

    #[test]
    fn test_validation_invalid_webhook_secret_prefix() {
        let config = PaymentConfig::new("sk_test_xxx", "secret_xxx");
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        );
    }

    #[test]
    fn test_validation_tolerance_bounds() {
        let mut config = valid_config();

        config.webhook_tolerance_secs = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidWebhookTolerance));

        config.webhook_tolerance_secs = 3601;
        assert_eq!(config.validate(), Err(ValidationError::InvalidWebhookTolerance));

        config.webhook_tolerance_secs = 3600;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_currency() {
        let mut config = valid_config();
        config.default_currency = "dollars".to_string();
        assert_eq!(config.validate(), Err(ValidationError::InvalidCurrency));
    }

    #[test]
    fn test_validation_invalid_redirect_url() {
        let mut config = valid_config();
        config.checkout_cancel_url = "/cancel".to_string();
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidUrl("checkout_cancel_url"))
        );
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", valid_config());
        assert!(!debug.contains("sk_test_abcd1234"));
        assert!(!debug.contains("whsec_xyz789"));
    }
}
