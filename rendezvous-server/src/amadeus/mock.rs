//! Mock Amadeus client for running without API credentials.
//!
//! Loads flight-offer responses from JSON files and serves them as if they
//! were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{IataCode, Offer, PriceQuery};
use crate::planner::OfferSource;

use super::error::AmadeusError;
use super::types::{FlightOffersResponse, convert_offers};

/// Mock client that serves flight offers from fixture files.
///
/// Routes without a fixture have no offers.
#[derive(Debug, Clone)]
pub struct MockAmadeusClient {
    routes: Arc<HashMap<(IataCode, IataCode), FlightOffersResponse>>,
}

impl MockAmadeusClient {
    /// Load fixtures from a directory.
    ///
    /// Expects files named `{ORIGIN}-{DESTINATION}.json` (e.g. `MAD-LIS.json`)
    /// containing a flight-offers response body.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, AmadeusError> {
        let data_dir = data_dir.as_ref();
        let mut routes = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            AmadeusError::Mock(format!("failed to read {}: {e}", data_dir.display()))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| AmadeusError::Mock(format!("failed to read directory entry: {e}")))?
                .path();

            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| AmadeusError::Mock(format!("invalid filename: {path:?}")))?;

            let route = parse_route(stem)
                .ok_or_else(|| AmadeusError::Mock(format!("invalid route in filename: {stem}")))?;

            let json = std::fs::read_to_string(&path)
                .map_err(|e| AmadeusError::Mock(format!("failed to read {path:?}: {e}")))?;

            let response: FlightOffersResponse = serde_json::from_str(&json)
                .map_err(|e| AmadeusError::Mock(format!("failed to parse {path:?}: {e}")))?;

            routes.insert(route, response);
        }

        if routes.is_empty() {
            return Err(AmadeusError::Mock(format!(
                "no route fixtures found in {}",
                data_dir.display()
            )));
        }

        Ok(Self {
            routes: Arc::new(routes),
        })
    }

    /// Routes with fixture data.
    pub fn available_routes(&self) -> Vec<(IataCode, IataCode)> {
        let mut routes: Vec<_> = self.routes.keys().copied().collect();
        routes.sort();
        routes
    }

    /// Mimics [`super::AmadeusClient::search_flight_offers`].
    ///
    /// Dates and options are ignored; fixture data is static. At most
    /// `max_results` offers are returned, as the real API does.
    pub fn search_flight_offers(&self, query: &PriceQuery) -> Vec<Offer> {
        self.routes
            .get(&(query.origin, query.destination))
            .map(|response| {
                let mut offers = convert_offers(response.clone());
                offers.truncate(usize::from(query.options.max_results));
                offers
            })
            .unwrap_or_default()
    }
}

impl OfferSource for MockAmadeusClient {
    async fn search_offers(&self, query: &PriceQuery) -> Result<Vec<Offer>, AmadeusError> {
        Ok(self.search_flight_offers(query))
    }
}

/// Parse `MAD-LIS` into an (origin, destination) pair.
fn parse_route(stem: &str) -> Option<(IataCode, IataCode)> {
    let (origin, destination) = stem.split_once('-')?;
    Some((
        IataCode::parse_normalized(origin).ok()?,
        IataCode::parse_normalized(destination).ok()?,
    ))
}
