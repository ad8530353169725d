//! Group destination planner.
//!
//! This module answers: "given where each of us is flying from, where can
//! we all meet, and which of those places is best for the group?"
//!
//! Every candidate destination is priced from every origin. Destinations
//! that some origin cannot reach are dropped; the rest are scored for cost
//! and fairness and ranked under the requested criterion.

mod aggregate;
mod config;
mod fetch;
mod rank;
mod score;
mod search;


pub use aggregate::{Aggregation, Aggregator};
pub use config::{AuthFailurePolicy, DEFAULT_DESTINATIONS, PlannerConfig};
pub use fetch::{OfferSource, PriceFetcher, cheapest_offer};
pub use rank::{compare_destinations, rank_destinations};
pub use score::{DestinationAggregate, fairness_score, round_to};
pub use search::{Planner, SearchError, SearchRequest, SearchResult};
