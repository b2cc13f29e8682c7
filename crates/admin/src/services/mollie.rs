//! Thin Mollie client for payment re-sync.
//!
//! The back-office only ever reads payment state; creating payments is
//! the storefront's job.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use seedling_core::types::PaymentStatus;

/// Mollie API base URL.
const BASE_URL: &str = "https://api.mollie.com/v2";

/// Errors that can occur when interacting with the Mollie API.
#[derive(Debug, Error)]
pub enum MollieError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status}")]
    Api { status: u16 },

    /// Payment not found at the provider.
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Failed to build the client.
    #[error("Client error: {0}")]
    Client(String),
}

#[derive(Debug, Deserialize)]
struct PaymentResource {
    status: String,
}

/// Read-only Mollie API client.
#[derive(Clone)]
pub struct MollieClient {
    client: reqwest::Client,
}

impl MollieClient {
    /// Create a new Mollie API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_key: &SecretString) -> Result<Self, MollieError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| MollieError::Client(format!("Invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a payment's current status from the provider.
    ///
    /// # Errors
    ///
    /// Returns `MollieError::PaymentNotFound` for unknown IDs, other
    /// variants for transport/API failures.
    pub async fn get_payment_status(&self, payment_id: &str) -> Result<PaymentStatus, MollieError> {
        let url = format!("{BASE_URL}/payments/{payment_id}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MollieError::PaymentNotFound(payment_id.to_owned()));
        }
        if !status.is_success() {
            return Err(MollieError::Api {
                status: status.as_u16(),
            });
        }

        let resource: PaymentResource = response.json().await?;
        Ok(PaymentStatus::parse(&resource.status))
    }
}
