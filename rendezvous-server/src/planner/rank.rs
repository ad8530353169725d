//! Destination ranking for search results.
//!
//! Ranks complete destinations under the group's chosen criterion. Every
//! criterion has a full tie-break chain, so the order is deterministic.

use std::cmp::Ordering;

use crate::domain::OptimizationCriterion;

use super::score::DestinationAggregate;

/// Compare two destinations under a criterion. `Less` ranks first.
///
/// | criterion | primary            | then               | then             |
/// |-----------|--------------------|--------------------|------------------|
/// | total     | total cost asc     | fairness desc      |                  |
/// | fairness  | fairness desc      | total cost asc     |                  |
/// | co2       | CO2 proxy asc      | total cost asc     | fairness desc    |
pub fn compare_destinations(
    a: &DestinationAggregate,
    b: &DestinationAggregate,
    criterion: OptimizationCriterion,
) -> Ordering {
    let cost = || a.total_cost().total_cmp(&b.total_cost());
    let fairness = || b.fairness_score().total_cmp(&a.fairness_score());

    match criterion {
        OptimizationCriterion::Total => cost().then_with(fairness),
        OptimizationCriterion::Fairness => fairness().then_with(cost),
        OptimizationCriterion::Co2 => a
            .co2_proxy()
            .total_cmp(&b.co2_proxy())
            .then_with(cost)
            .then_with(fairness),
    }
}

/// Rank destinations best-first.
///
/// The sort is stable: destinations equal on every key keep their input
/// order.
pub fn rank_destinations(
    mut destinations: Vec<DestinationAggregate>,
    criterion: OptimizationCriterion,
) -> Vec<DestinationAggregate> {
    destinations.sort_by(|a, b| compare_destinations(a, b, criterion));
    destinations
}
