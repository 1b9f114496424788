//! CreateProductHandler - Command handler for adding a product with a price.

use std::sync::Arc;

use crate::domain::checkout::{Currency, ProductDraft};
use crate::ports::{CreateProductRequest, PaymentProvider, Product};

use super::CheckoutError;

/// Command to create a product with a default one-time price.
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit.
    pub unit_amount: i64,
    /// Three-letter code; the handler's default currency when absent.
    pub currency: Option<String>,
}

/// Handler for creating products in the payment provider's catalog.
pub struct CreateProductHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    default_currency: Currency,
}

impl CreateProductHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, default_currency: Currency) -> Self {
        Self {
            payment_provider,
            default_currency,
        }
    }

    pub async fn handle(&self, cmd: CreateProductCommand) -> Result<Product, CheckoutError> {
        // 1. Validate input before any provider call
        let currency = match cmd.currency.as_deref() {
            Some(code) => Currency::parse(code)?,
            None => self.default_currency.clone(),
        };
        let draft = ProductDraft::new(
            &cmd.name,
            cmd.description.as_deref(),
            cmd.unit_amount,
            currency,
        )?;

        // 2. Create the product and its price
        let product = self
            .payment_provider
            .create_product(CreateProductRequest::from(draft))
            .await?;

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::checkout::ValidationError;
    use crate::ports::PaymentError;

    fn handler(mock: &MockPaymentProvider) -> CreateProductHandler {
        CreateProductHandler::new(Arc::new(mock.clone()), Currency::parse("usd").unwrap())
    }

    fn command() -> CreateProductCommand {
        CreateProductCommand {
            name: "T-shirt".to_string(),
            description: Some("Organic cotton".to_string()),
            unit_amount: 2500,
            currency: None,
        }
    }

    #[tokio::test]
    async fn creates_product_with_default_currency() {
        let mock = MockPaymentProvider::new();

        let product = handler(&mock).handle(command()).await.unwrap();

        assert_eq!(product.name, "T-shirt");
        assert_eq!(product.currency.as_str(), "usd");
        assert_eq!(product.unit_amount, 2500);
        assert_eq!(mock.call_count("create_product"), 1);
    }

    #[tokio::test]
    async fn explicit_currency_overrides_default() {
        let mock = MockPaymentProvider::new();
        let cmd = CreateProductCommand {
            currency: Some("EUR".to_string()),
            ..command()
        };

        let product = handler(&mock).handle(cmd).await.unwrap();

        assert_eq!(product.currency.as_str(), "eur");
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_provider() {
        let mock = MockPaymentProvider::new();
        let cmd = CreateProductCommand {
            unit_amount: 0,
            ..command()
        };

        let err = handler(&mock).handle(cmd).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::TooSmall { field: "unit_amount", .. })
        ));
        assert!(!mock.was_called("create_product"));
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let mock = MockPaymentProvider::new();
        mock.set_error(PaymentError::network("connection reset"));

        let err = handler(&mock).handle(command()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Payment(_)));
    }
}
