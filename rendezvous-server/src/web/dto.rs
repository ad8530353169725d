//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{IataCode, LegResult, OptimizationCriterion};
use crate::planner::{DestinationAggregate, SearchResult, round_to};

/// Request to search for common destinations.
#[derive(Debug, Deserialize)]
pub struct DestinationSearchRequest {
    /// Origin airport codes, one per traveler
    #[serde(default)]
    pub origins: Vec<String>,

    /// Candidate destination codes (defaults to the configured set)
    pub destinations: Option<Vec<String>>,

    /// Departure date in YYYY-MM-DD format
    pub date: Option<String>,

    /// Restrict to non-stop flights
    pub non_stop: Option<bool>,

    /// "total", "fairness" or "co2"
    pub criterion: Option<String>,
}

/// Response for destination search.
#[derive(Debug, Serialize)]
pub struct DestinationSearchResponse {
    /// Origins as searched, in input order
    pub origins: Vec<IataCode>,

    /// Departure date (YYYY-MM-DD)
    pub date: String,

    /// Criterion the results are ranked by
    pub criterion: OptimizationCriterion,

    /// Leg lookups attempted
    pub legs_attempted: usize,

    /// Leg lookups that produced a price
    pub legs_priced: usize,

    /// Leg lookups whose provider call failed
    pub legs_failed: usize,

    /// Destinations reachable from every origin, best first
    pub destinations: Vec<DestinationResult>,
}

impl DestinationSearchResponse {
    /// Build the response for a finished search.
    pub fn new(origins: Vec<IataCode>, date: chrono::NaiveDate, result: SearchResult) -> Self {
        Self {
            origins,
            date: date.format("%Y-%m-%d").to_string(),
            criterion: result.criterion,
            legs_attempted: result.legs_attempted,
            legs_priced: result.legs_priced,
            legs_failed: result.legs_failed,
            destinations: result
                .destinations
                .iter()
                .map(DestinationResult::from_aggregate)
                .collect(),
        }
    }
}

/// A ranked destination. Money amounts are rounded to cents.
#[derive(Debug, Serialize)]
pub struct DestinationResult {
    /// Destination airport code
    pub destination: IataCode,

    /// Sum of all travelers' cheapest fares
    pub total_cost: f64,

    /// Average fare
    pub average_per_traveler: f64,

    pub min_price: f64,
    pub max_price: f64,
    pub price_spread: f64,

    /// 0 to 100; 100 means everyone pays the same
    pub fairness_score: f64,

    /// Emissions stand-in (currently the average fare)
    pub co2_proxy: f64,

    /// One priced leg per origin, in origin order
    pub legs: Vec<LegResult>,
}

impl DestinationResult {
    /// Convert from a scored destination.
    pub fn from_aggregate(aggregate: &DestinationAggregate) -> Self {
        Self {
            destination: aggregate.destination(),
            total_cost: round_to(aggregate.total_cost(), 2),
            average_per_traveler: round_to(aggregate.average_per_traveler(), 2),
            min_price: round_to(aggregate.min_price(), 2),
            max_price: round_to(aggregate.max_price(), 2),
            price_spread: round_to(aggregate.price_spread(), 2),
            fairness_score: aggregate.fairness_score(),
            co2_proxy: aggregate.co2_proxy(),
            legs: aggregate.legs().to_vec(),
        }
    }
}

/// Response listing the default candidate destinations.
#[derive(Debug, Serialize)]
pub struct DefaultDestinationsResponse {
    pub destinations: Vec<IataCode>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
