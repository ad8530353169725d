//! Amadeus HTTP client.
//!
//! Provides async flight-offer searches against the Amadeus Self-Service
//! API. Handles token acquisition, request concurrency and conversion to
//! domain offers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{Offer, PriceQuery};
use crate::planner::OfferSource;

use super::error::AmadeusError;
use super::token::{ClientCredentials, OAuthIssuer, TokenCache};
use super::types::{FlightOffersResponse, convert_offers};

/// Default base URL (the Amadeus test environment).
const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default timeout shared by every provider call.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default margin subtracted from the provider's token lifetime.
const DEFAULT_TOKEN_SAFETY_MARGIN_SECS: u64 = 60;

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";

/// Configuration for the Amadeus client.
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Base URL for the API (defaults to the test environment)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Seconds shaved off each token's lifetime
    pub token_safety_margin_secs: u64,
}

impl AmadeusConfig {
    /// Create a new config with the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_safety_margin_secs: DEFAULT_TOKEN_SAFETY_MARGIN_SECS,
        }
    }

    /// Set a custom base URL (production, or a local stub for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the token safety margin.
    pub fn with_token_safety_margin(mut self, secs: u64) -> Self {
        self.token_safety_margin_secs = secs;
        self
    }

    /// Credentials, if both halves are configured.
    pub fn credentials(&self) -> Option<ClientCredentials> {
        ClientCredentials::new(self.client_id.clone(), self.client_secret.clone())
    }
}

/// Amadeus flight-offers client.
///
/// Cheap to clone; clones share the token cache and the request semaphore.
#[derive(Clone)]
pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
    tokens: Arc<TokenCache<OAuthIssuer>>,
}

impl AmadeusClient {
    /// Create a new client with the given configuration.
    ///
    /// Missing credentials are not an error here; every search then fails
    /// with [`AmadeusError::AuthConfig`].
    pub fn new(config: AmadeusConfig) -> Result<Self, AmadeusError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let issuer = OAuthIssuer::new(
            http.clone(),
            format!("{}{TOKEN_PATH}", config.base_url),
            config.credentials(),
        );
        let tokens = TokenCache::new(
            issuer,
            Duration::from_secs(config.token_safety_margin_secs),
        );

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            tokens: Arc::new(tokens),
        })
    }

    /// Search flight offers for one leg.
    pub async fn search_flight_offers(
        &self,
        query: &PriceQuery,
    ) -> Result<Vec<Offer>, AmadeusError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| AmadeusError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let token = self.tokens.get_token().await?;

        let url = format!("{}{FLIGHT_OFFERS_PATH}", self.base_url);
        debug!(
            origin = %query.origin,
            destination = %query.destination,
            date = %query.date,
            "searching flight offers"
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.access_token())
            .query(&offer_search_params(query))
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // The provider revoked the token early; the next leg re-exchanges.
            warn!("flight-offers rejected the bearer token, invalidating");
            self.tokens.invalidate(&token).await;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AmadeusError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        let offers: FlightOffersResponse =
            serde_json::from_str(&body).map_err(|e| AmadeusError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(convert_offers(offers))
    }
}

impl OfferSource for AmadeusClient {
    async fn search_offers(&self, query: &PriceQuery) -> Result<Vec<Offer>, AmadeusError> {
        self.search_flight_offers(query).await
    }
}

/// Query-string parameters for a flight-offers search.
///
/// `nonStop` and `returnDate` are only sent when set.
fn offer_search_params(query: &PriceQuery) -> Vec<(&'static str, String)> {
    let options = &query.options;
    let mut params = vec![
        ("originLocationCode", query.origin.to_string()),
        ("destinationLocationCode", query.destination.to_string()),
        ("departureDate", query.date.format("%Y-%m-%d").to_string()),
        ("adults", options.travelers.to_string()),
        ("currencyCode", options.currency.clone()),
        ("max", options.max_results.to_string()),
    ];

    if let Some(non_stop) = options.non_stop {
        params.push(("nonStop", non_stop.to_string()));
    }

    if let Some(return_date) = options.return_date {
        params.push(("returnDate", return_date.format("%Y-%m-%d").to_string()));
    }

    params
}
