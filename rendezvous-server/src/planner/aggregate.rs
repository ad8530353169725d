//! Origin×destination price matrix with the completeness filter.
//!
//! Every candidate destination is priced from every origin. A destination
//! survives only if all of its legs priced; partial credit is never given.

use chrono::NaiveDate;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::debug;

use crate::domain::{IataCode, LegResult, SearchOptions};

use super::config::{AuthFailurePolicy, PlannerConfig};
use super::fetch::{OfferSource, PriceFetcher};
use super::score::DestinationAggregate;
use super::search::SearchError;

/// Output of one aggregation pass, in candidate order (not ranked).
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Complete, scored destinations.
    pub destinations: Vec<DestinationAggregate>,

    /// Leg lookups attempted (including same-airport legs).
    pub legs_attempted: usize,

    /// Leg lookups that produced a price.
    pub legs_priced: usize,

    /// Leg lookups whose provider call failed, as opposed to finding no
    /// usable price.
    pub legs_failed: usize,
}

/// Drop repeated codes, keeping the first occurrence.
fn dedup_preserving_order(codes: &[IataCode]) -> Vec<IataCode> {
    let mut seen = std::collections::HashSet::new();
    codes.iter().copied().filter(|c| seen.insert(*c)).collect()
}

/// Runs the leg matrix for one search.
pub struct Aggregator<'a, S> {
    fetcher: &'a PriceFetcher<S>,
    config: &'a PlannerConfig,
}

impl<'a, S: OfferSource> Aggregator<'a, S> {
    pub fn new(fetcher: &'a PriceFetcher<S>, config: &'a PlannerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Price every origin to every destination and keep complete ones.
    ///
    /// Legs are issued destination-major, origin-minor, with at most
    /// `max_concurrent_legs` in flight. Results come back in issue order,
    /// so each destination's legs stay in origin order.
    ///
    /// Only fails under [`AuthFailurePolicy::FailFast`]; no surviving
    /// destination is an empty result, not an error.
    pub async fn aggregate(
        &self,
        origins: &[IataCode],
        destinations: &[IataCode],
        date: NaiveDate,
        options: &SearchOptions,
    ) -> Result<Aggregation, SearchError> {
        let destinations = dedup_preserving_order(destinations);
        if origins.is_empty() || destinations.is_empty() {
            return Ok(Aggregation::default());
        }

        let tasks: Vec<(IataCode, IataCode)> = destinations
            .iter()
            .flat_map(|d| origins.iter().map(move |o| (*d, *o)))
            .collect();
        let legs_attempted = tasks.len();
        let fail_fast = self.config.auth_failures == AuthFailurePolicy::FailFast;

        let legs: Vec<LegResult> = stream::iter(tasks)
            .map(move |(destination, origin)| async move {
                let leg = self
                    .fetcher
                    .cheapest_price(origin, destination, date, options)
                    .await;

                let auth_failure = leg
                    .issue()
                    .filter(|issue| fail_fast && issue.kind.is_auth())
                    .map(|issue| issue.reason.clone());

                match auth_failure {
                    Some(reason) => Err(SearchError::Auth(reason)),
                    None => Ok(leg),
                }
            })
            .buffered(self.config.max_concurrent_legs.max(1))
            .try_collect()
            .await?;

        let legs_priced = legs.iter().filter(|leg| leg.is_priced()).count();
        let legs_failed = legs
            .iter()
            .filter(|leg| leg.issue().is_some_and(|issue| issue.kind.is_failure()))
            .count();

        let mut complete = Vec::new();
        for (destination, legs) in destinations.iter().zip(legs.chunks(origins.len())) {
            if let Some(missing) = legs.iter().find(|leg| !leg.is_priced()) {
                debug!(
                    destination = %destination,
                    origin = %missing.origin(),
                    reason = missing.issue().map(|i| i.reason.as_str()).unwrap_or_default(),
                    "dropping incomplete destination"
                );
                continue;
            }

            let aggregate = DestinationAggregate::score(*destination, legs.to_vec())
                .map_err(|e| SearchError::Internal(e.to_string()))?;
            complete.push(aggregate);
        }

        debug!(
            legs_attempted,
            legs_priced,
            legs_failed,
            complete = complete.len(),
            "aggregation complete"
        );

        Ok(Aggregation {
            destinations: complete,
            legs_attempted,
            legs_priced,
            legs_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let codes: Vec<_> = ["LIS", "AMS", "LIS", "BER", "AMS"]
            .iter()
            .map(|c| IataCode::parse(c).unwrap())
            .collect();
        let deduped: Vec<_> = dedup_preserving_order(&codes)
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();
        assert_eq!(deduped, vec!["LIS", "AMS", "BER"]);
    }
}
