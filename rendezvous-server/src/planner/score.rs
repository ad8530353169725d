//! Cost and fairness scoring for complete destinations.
//!
//! Only destinations where every origin has a price can be scored; the
//! constructor refuses anything else, so a [`DestinationAggregate`] is
//! complete by construction.

use crate::domain::{DomainError, IataCode, LegResult};

/// Highest score a destination with any price spread can get.
const MAX_UNEVEN_FAIRNESS: f64 = 99.9;

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fairness of a split: 100 when everyone pays the same, falling linearly
/// as the spread grows relative to the average, floored at 0.
///
/// Rounded to one decimal. A non-zero spread never rounds up to 100.
pub fn fairness_score(price_spread: f64, average: f64) -> f64 {
    if average <= 0.0 {
        return 0.0;
    }

    let ratio = price_spread / average;
    let score = round_to((100.0 - ratio * 100.0).clamp(0.0, 100.0), 1);

    if price_spread > 0.0 {
        score.min(MAX_UNEVEN_FAIRNESS)
    } else {
        score
    }
}

/// A destination every origin can reach, with its group metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationAggregate {
    destination: IataCode,
    legs: Vec<LegResult>,
    total_cost: f64,
    average_per_traveler: f64,
    min_price: f64,
    max_price: f64,
    price_spread: f64,
    fairness_score: f64,
    co2_proxy: f64,
}

impl DestinationAggregate {
    /// Score a destination from its legs (one per origin, in origin order).
    ///
    /// Fails if there are no legs or any leg is unpriced.
    pub fn score(destination: IataCode, legs: Vec<LegResult>) -> Result<Self, DomainError> {
        let prices = legs
            .iter()
            .map(|leg| {
                leg.price()
                    .ok_or(DomainError::IncompleteDestination {
                        destination,
                        origin: leg.origin(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if prices.is_empty() {
            return Err(DomainError::NoLegs(destination));
        }

        let total_cost: f64 = prices.iter().sum();
        let average_per_traveler = total_cost / prices.len() as f64;
        let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let price_spread = max_price - min_price;

        Ok(Self {
            destination,
            legs,
            total_cost,
            average_per_traveler,
            min_price,
            max_price,
            price_spread,
            fairness_score: fairness_score(price_spread, average_per_traveler),
            // Placeholder: cost stands in for emissions until there is a
            // distance-based model.
            co2_proxy: round_to(average_per_traveler, 2),
        })
    }

    pub fn destination(&self) -> IataCode {
        self.destination
    }

    /// Legs in origin order, all priced.
    pub fn legs(&self) -> &[LegResult] {
        &self.legs
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Full precision; round for display only.
    pub fn average_per_traveler(&self) -> f64 {
        self.average_per_traveler
    }

    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    pub fn price_spread(&self) -> f64 {
        self.price_spread
    }

    /// 0 to 100, one decimal.
    pub fn fairness_score(&self) -> f64 {
        self.fairness_score
    }

    /// Approximate emissions stand-in; currently the average cost.
    pub fn co2_proxy(&self) -> f64 {
        self.co2_proxy
    }
}
