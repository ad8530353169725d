//! Runtime choice between the live API and fixture data.

use crate::domain::{Offer, PriceQuery};
use crate::planner::OfferSource;

use super::client::AmadeusClient;
use super::error::AmadeusError;
use super::mock::MockAmadeusClient;

/// The offer backend the server was started with.
#[derive(Clone)]
pub enum AmadeusBackend {
    Live(AmadeusClient),
    Mock(MockAmadeusClient),
}

impl AmadeusBackend {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AmadeusBackend::Live(_) => "live",
            AmadeusBackend::Mock(_) => "mock",
        }
    }
}

impl OfferSource for AmadeusBackend {
    async fn search_offers(&self, query: &PriceQuery) -> Result<Vec<Offer>, AmadeusError> {
        match self {
            AmadeusBackend::Live(client) => client.search_offers(query).await,
            AmadeusBackend::Mock(client) => client.search_offers(query).await,
        }
    }
}
