//! Per-leg price lookup.
//!
//! A leg is one origin→destination lookup. Whatever goes wrong with a leg
//! stays with that leg: failures become an unpriced [`LegResult`] tagged
//! with why, and the rest of the search carries on.

use std::future::Future;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::amadeus::AmadeusError;
use crate::domain::{IataCode, LegIssueKind, LegResult, Offer, PriceQuery, SearchOptions};

/// Trait for searching flight offers.
///
/// This abstraction allows the planner to be tested with mock data.
pub trait OfferSource: Send + Sync {
    /// Search offers for one leg.
    fn search_offers(
        &self,
        query: &PriceQuery,
    ) -> impl Future<Output = Result<Vec<Offer>, AmadeusError>> + Send;
}

/// Cheapest parseable grand total among `offers`.
///
/// Offers whose price does not parse are skipped.
pub fn cheapest_offer(offers: &[Offer]) -> Option<f64> {
    offers
        .iter()
        .filter_map(Offer::total)
        .min_by(|a, b| a.total_cmp(b))
}

/// Resolves the cheapest price for single legs.
pub struct PriceFetcher<S> {
    source: S,
}

impl<S: OfferSource> PriceFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying offer source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Price one leg.
    ///
    /// Never fails: a leg from an airport to itself, a route without offers
    /// and a failed provider call all come back unpriced with a tagged issue.
    pub async fn cheapest_price(
        &self,
        origin: IataCode,
        destination: IataCode,
        date: NaiveDate,
        options: &SearchOptions,
    ) -> LegResult {
        if origin == destination {
            return LegResult::unpriced(
                origin,
                LegIssueKind::SameAirport,
                format!("{origin} is both origin and destination"),
            );
        }

        let query = PriceQuery::new(origin, destination, date, options.clone());

        let offers = match self.source.search_offers(&query).await {
            Ok(offers) => offers,
            Err(e) => {
                warn!(
                    origin = %origin,
                    destination = %destination,
                    error = %e,
                    "price lookup failed"
                );
                return LegResult::unpriced(origin, e.leg_issue_kind(), e.to_string());
            }
        };

        if offers.is_empty() {
            debug!(origin = %origin, destination = %destination, "no offers");
            return LegResult::unpriced(
                origin,
                LegIssueKind::NoOffers,
                format!("no offers for {origin}-{destination} on {date}"),
            );
        }

        match cheapest_offer(&offers) {
            Some(price) => {
                debug!(origin = %origin, destination = %destination, price, "priced leg");
                LegResult::priced(origin, price)
            }
            None => {
                warn!(
                    origin = %origin,
                    destination = %destination,
                    offers = offers.len(),
                    "no offer had a parseable price"
                );
                LegResult::unpriced(
                    origin,
                    LegIssueKind::UnparseablePrice,
                    format!("none of {} offers had a parseable grand total", offers.len()),
                )
            }
        }
    }
}
