//! Mollie API client for hosted checkout payments.
//!
//! The storefront never handles card data: checkout creates a payment at
//! Mollie, stores the returned payment ID, and sends the customer to the
//! hosted checkout URL. Status changes come back through the webhook,
//! which re-fetches the payment here because the webhook body itself is
//! untrusted.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use seedling_core::types::{CurrencyCode, PaymentStatus};

use crate::config::MollieConfig;

/// Mollie API base URL.
const BASE_URL: &str = "https://api.mollie.com/v2";

/// Errors that can occur when interacting with the Mollie API.
#[derive(Debug, Error)]
pub enum MollieError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Payment not found at the provider.
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A monetary amount in Mollie's wire format: currency code plus a
/// string value with exactly two decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MollieAmount {
    pub currency: String,
    pub value: String,
}

impl MollieAmount {
    /// Build from a decimal amount and currency.
    #[must_use]
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self {
            currency: currency.code().to_owned(),
            value: format!("{amount:.2}"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentRequest<'a> {
    amount: &'a MollieAmount,
    description: &'a str,
    redirect_url: &'a str,
    webhook_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_id: Option<&'a str>,
    metadata: PaymentMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct PaymentMetadata {
    order_id: i32,
}

#[derive(Debug, Deserialize)]
struct HalLink {
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct PaymentLinks {
    checkout: Option<HalLink>,
}

#[derive(Debug, Deserialize)]
struct PaymentResource {
    id: String,
    status: String,
    #[serde(rename = "_links", default)]
    links: PaymentLinks,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    detail: String,
}

/// A payment as the storefront sees it: provider ID, parsed status, and
/// the hosted checkout URL while one exists.
#[derive(Debug, Clone)]
pub struct ProviderPayment {
    pub id: String,
    pub status: PaymentStatus,
    pub checkout_url: Option<String>,
}

/// Mollie API client.
#[derive(Clone)]
pub struct MollieClient {
    client: reqwest::Client,
    profile_id: Option<String>,
}

impl MollieClient {
    /// Create a new Mollie API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &MollieConfig) -> Result<Self, MollieError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| MollieError::Parse(format!("Invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            profile_id: config.profile_id.clone(),
        })
    }

    /// Create a hosted-checkout payment for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response cannot
    /// be parsed.
    pub async fn create_payment(
        &self,
        amount: &MollieAmount,
        description: &str,
        order_id: i32,
        redirect_url: &str,
        webhook_url: &str,
    ) -> Result<ProviderPayment, MollieError> {
        let url = format!("{BASE_URL}/payments");
        let body = CreatePaymentRequest {
            amount,
            description,
            redirect_url,
            webhook_url,
            profile_id: self.profile_id.as_deref(),
            metadata: PaymentMetadata { order_id },
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let resource = Self::parse_payment(response).await?;
        Ok(resource)
    }

    /// Fetch a payment's current state from the provider.
    ///
    /// # Errors
    ///
    /// Returns `MollieError::PaymentNotFound` for unknown IDs, other
    /// variants for transport/API failures.
    pub async fn get_payment(&self, payment_id: &str) -> Result<ProviderPayment, MollieError> {
        let url = format!("{BASE_URL}/payments/{payment_id}");
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MollieError::PaymentNotFound(payment_id.to_owned()));
        }

        Self::parse_payment(response).await
    }

    async fn parse_payment(response: reqwest::Response) -> Result<ProviderPayment, MollieError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.detail)
                .unwrap_or_default();
            return Err(MollieError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let resource: PaymentResource = response
            .json()
            .await
            .map_err(|e| MollieError::Parse(e.to_string()))?;

        Ok(ProviderPayment {
            id: resource.id,
            status: PaymentStatus::parse(&resource.status),
            checkout_url: resource.links.checkout.map(|l| l.href),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_formats_two_decimals() {
        let amount = MollieAmount::new(Decimal::new(1995, 2), CurrencyCode::EUR);
        assert_eq!(amount.currency, "EUR");
        assert_eq!(amount.value, "19.95");

        let whole = MollieAmount::new(Decimal::new(20, 0), CurrencyCode::USD);
        assert_eq!(whole.value, "20.00");
    }

    #[test]
    fn test_create_payment_request_wire_shape() {
        let amount = MollieAmount::new(Decimal::new(500, 2), CurrencyCode::EUR);
        let request = CreatePaymentRequest {
            amount: &amount,
            description: "Order S2026-000001",
            redirect_url: "https://seedling.nl/checkout/complete?order=1",
            webhook_url: "https://seedling.nl/webhooks/mollie",
            profile_id: None,
            metadata: PaymentMetadata { order_id: 1 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["amount"]["value"], "5.00");
        assert_eq!(json["redirectUrl"], "https://seedling.nl/checkout/complete?order=1");
        assert_eq!(json["webhookUrl"], "https://seedling.nl/webhooks/mollie");
        assert_eq!(json["metadata"]["order_id"], 1);
        assert!(json.get("profileId").is_none());
    }

    #[test]
    fn test_payment_resource_parses_checkout_link() {
        let body = r#"{
            "id": "tr_WDqYK6vllg",
            "status": "open",
            "_links": {
                "checkout": { "href": "https://www.mollie.com/checkout/select-method/WDqYK6vllg", "type": "text/html" }
            }
        }"#;
        let resource: PaymentResource = serde_json::from_str(body).unwrap();
        assert_eq!(resource.id, "tr_WDqYK6vllg");
        assert_eq!(PaymentStatus::parse(&resource.status), PaymentStatus::Open);
        assert!(resource.links.checkout.is_some());
    }

    #[test]
    fn test_payment_resource_without_links() {
        let body = r#"{ "id": "tr_abc", "status": "paid" }"#;
        let resource: PaymentResource = serde_json::from_str(body).unwrap();
        assert!(resource.links.checkout.is_none());
        assert_eq!(PaymentStatus::parse(&resource.status), PaymentStatus::Paid);
    }
}
