//! Flight offer gateway
//!
//! Talks to the external flight-search provider. Failures here are
//! never surfaced to the user directly; callers degrade to answering
//! without live offers.

mod extract;
mod types;

pub use extract::{extract_search_params, SearchParams};
pub use types::{summarize_offers, FlightOffer, Itinerary, OfferPrice, Segment, SegmentEndpoint};

use crate::config::FlightConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

/// Provider calls get a short budget so a slow upstream cannot stall
/// the whole turn.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Provider responses are capped before summarization.
const MAX_OFFERS: u32 = 5;

#[derive(Debug, Error)]
pub enum FlightError {
    #[error("flight provider credentials not configured")]
    MissingCredentials,
    #[error("flight provider authentication failed: {0}")]
    Auth(String),
    #[error("flight provider error: {0}")]
    Upstream(String),
    #[error("failed to parse provider response: {0}")]
    Parse(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Common interface for flight offer search
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<Vec<FlightOffer>, FlightError>;
}

/// Client for the Amadeus self-service flight-offers API
pub struct AmadeusGateway {
    client: Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    base_url: String,
}

impl AmadeusGateway {
    pub fn new(config: &FlightConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Client-credentials grant. Exchanged per search; tokens are not
    /// cached across turns.
    async fn access_token(&self) -> Result<String, FlightError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(FlightError::MissingCredentials)?;
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or(FlightError::MissingCredentials)?;

        let response = self
            .client
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlightError::Auth(format!("HTTP {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FlightError::Parse(e.to_string()))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl FlightProvider for AmadeusGateway {
    async fn search(&self, params: &SearchParams) -> Result<Vec<FlightOffer>, FlightError> {
        let token = self.access_token().await?;

        let date = params.departure_date.format("%Y-%m-%d").to_string();
        let adults = params.adults.to_string();
        let max = MAX_OFFERS.to_string();

        let response = self
            .client
            .get(format!("{}/v2/shopping/flight-offers", self.base_url))
            .bearer_auth(token)
            .query(&[
                ("originLocationCode", params.origin.as_str()),
                ("destinationLocationCode", params.destination.as_str()),
                ("departureDate", date.as_str()),
                ("adults", adults.as_str()),
                ("max", max.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlightError::Upstream(format!("HTTP {status}: {body}")));
        }

        let body: OffersResponse = response
            .json()
            .await
            .map_err(|e| FlightError::Parse(e.to_string()))?;

        Ok(body.data.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OffersResponse {
    data: Option<Vec<FlightOffer>>,
}
