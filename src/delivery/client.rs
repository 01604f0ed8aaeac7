//! Remote fee service client

use std::time::Duration;

use async_trait::async_trait;
use clap::Args;
use mockall::automock;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FeeRequest;

/// Configuration for the remote delivery fee endpoint.
#[derive(Debug, Clone, Args)]
pub struct FeeEndpointConfig {
    /// Delivery fee service URL
    #[arg(
        long,
        env = "DELIVERY_FEE_URL",
        default_value = "http://localhost:5000/api/delivery-fee"
    )]
    pub url: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "DELIVERY_FEE_TIMEOUT_MS", default_value = "1500")]
    pub timeout_ms: u64,
}

/// Wire-level quote request sent to the fee service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuoteRequest {
    /// Distance in kilometres.
    pub distance: f64,

    /// Order subtotal in major currency units.
    pub order_value: Decimal,

    /// Whether the buyer has an active delivery subscription.
    pub has_subscription: bool,
}

impl FeeQuoteRequest {
    /// Build the wire request for a domain fee request.
    #[must_use]
    pub fn from_request(request: &FeeRequest<'_>) -> Self {
        Self {
            distance: request.distance_km(),
            order_value: *request.order_value().amount(),
            has_subscription: request.subscribed(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeeQuoteResponse {
    #[serde(rename = "deliveryFee")]
    delivery_fee: Decimal,
}

/// Errors that can occur when fetching a remote fee quote.
///
/// Every variant is recoverable: the engine falls back to the local tariff
/// and never surfaces these to its caller.
#[derive(Debug, Error)]
pub enum FeeClientError {
    /// An HTTP transport or deserialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status or an unusable body.
    #[error("unexpected response from fee service: {0}")]
    UnexpectedResponse(String),
}

/// A source of authoritative delivery fee quotes.
#[automock]
#[async_trait]
pub trait FeeQuoteClient: Send + Sync {
    /// Fetch the delivery charge, in major currency units, for the given request.
    ///
    /// # Errors
    ///
    /// Returns a [`FeeClientError`] if the service is unreachable, answers
    /// with a non-2xx status, or returns a body that cannot be used.
    async fn fetch_quote(&self, request: &FeeQuoteRequest) -> Result<Decimal, FeeClientError>;
}

/// HTTP client for the delivery fee service.
#[derive(Debug, Clone)]
pub struct HttpFeeQuoteClient {
    config: FeeEndpointConfig,
    http: Client,
}

impl HttpFeeQuoteClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`FeeClientError`] if the underlying HTTP client cannot be built.
    pub fn new(config: FeeEndpointConfig) -> Result<Self, FeeClientError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl FeeQuoteClient for HttpFeeQuoteClient {
    async fn fetch_quote(&self, request: &FeeQuoteRequest) -> Result<Decimal, FeeClientError> {
        let response = self.http.post(&self.config.url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(FeeClientError::UnexpectedResponse(format!(
                "quote request failed with status {status}: {text}"
            )));
        }

        let parsed: FeeQuoteResponse = response.json().await?;

        if parsed.delivery_fee < Decimal::ZERO {
            return Err(FeeClientError::UnexpectedResponse(format!(
                "negative delivery fee {}",
                parsed.delivery_fee
            )));
        }

        Ok(parsed.delivery_fee)
    }
}
