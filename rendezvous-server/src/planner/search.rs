//! Common-destination search.
//!
//! Validates a group's request, prices the origin×destination matrix,
//! scores complete destinations and ranks them.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{IataCode, OptimizationCriterion};

use super::aggregate::Aggregator;
use super::config::PlannerConfig;
use super::fetch::{OfferSource, PriceFetcher};
use super::rank::rank_destinations;
use super::score::DestinationAggregate;

/// Error from destination search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Authentication failed and the planner is configured to fail fast
    #[error("provider authentication failed: {0}")]
    Auth(String),

    /// The pipeline itself broke an invariant
    #[error("internal search error: {0}")]
    Internal(String),
}

/// Request for a common-destination search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// One entry per traveler, in input order. Repeats are allowed.
    pub origins: Vec<IataCode>,

    /// Candidate destinations; `None` uses the configured set.
    pub destinations: Option<Vec<IataCode>>,

    /// Departure date.
    pub date: NaiveDate,

    /// Restrict to non-stop flights, when set.
    pub non_stop: Option<bool>,

    /// Ranking criterion.
    pub criterion: OptimizationCriterion,
}

impl SearchRequest {
    /// Create a new search request with default destinations and criterion.
    pub fn new(origins: Vec<IataCode>, date: NaiveDate) -> Self {
        Self {
            origins,
            destinations: None,
            date,
            non_stop: None,
            criterion: OptimizationCriterion::default(),
        }
    }

    /// Build a request from raw user input.
    ///
    /// Codes are trimmed and uppercased. An empty destination list means
    /// "use the defaults". Unknown criteria fall back to total cost.
    pub fn parse(
        origins: &[String],
        destinations: Option<&[String]>,
        date: Option<&str>,
        non_stop: Option<bool>,
        criterion: Option<&str>,
    ) -> Result<Self, SearchError> {
        if origins.is_empty() {
            return Err(SearchError::InvalidRequest(
                "at least one origin is required".to_string(),
            ));
        }

        let origins = parse_codes(origins, "origin")?;

        let destinations = match destinations {
            Some(list) if !list.is_empty() => Some(parse_codes(list, "destination")?),
            _ => None,
        };

        let date = date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| SearchError::InvalidRequest("departure date is required".to_string()))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            SearchError::InvalidRequest(format!("invalid date {date:?}, expected YYYY-MM-DD"))
        })?;

        let request = Self {
            origins,
            destinations,
            date,
            non_stop,
            criterion: criterion
                .map(OptimizationCriterion::from_param)
                .unwrap_or_default(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.origins.is_empty() {
            return Err(SearchError::InvalidRequest(
                "at least one origin is required".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_codes(raw: &[String], what: &str) -> Result<Vec<IataCode>, SearchError> {
    raw.iter()
        .map(|s| {
            IataCode::parse_normalized(s)
                .map_err(|e| SearchError::InvalidRequest(format!("invalid {what} {s:?}: {e}")))
        })
        .collect()
}

/// Result of destination search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Complete destinations, ranked best-first. Empty when no destination
    /// could be reached from every origin.
    pub destinations: Vec<DestinationAggregate>,

    /// Criterion the destinations were ranked by.
    pub criterion: OptimizationCriterion,

    /// Number of leg lookups attempted.
    pub legs_attempted: usize,

    /// Number of leg lookups that produced a price.
    pub legs_priced: usize,

    /// Number of leg lookups whose provider call failed.
    pub legs_failed: usize,
}

/// Group destination planner.
pub struct Planner<S> {
    fetcher: PriceFetcher<S>,
    config: PlannerConfig,
}

impl<S: OfferSource> Planner<S> {
    /// Create a new planner.
    pub fn new(source: S, config: PlannerConfig) -> Self {
        Self {
            fetcher: PriceFetcher::new(source),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &PriceFetcher<S> {
        &self.fetcher
    }

    /// Search for the best common destinations.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        request.validate()?;

        let destinations = request
            .destinations
            .as_deref()
            .unwrap_or(&self.config.destinations);
        // The request only overrides the configured flag when it sets one.
        let options = match request.non_stop {
            Some(non_stop) => self.config.options.clone().with_non_stop(Some(non_stop)),
            None => self.config.options.clone(),
        };

        let aggregation = Aggregator::new(&self.fetcher, &self.config)
            .aggregate(&request.origins, destinations, request.date, &options)
            .await?;

        let ranked = rank_destinations(aggregation.destinations, request.criterion);

        if aggregation.legs_failed > 0 {
            warn!(
                failed = aggregation.legs_failed,
                attempted = aggregation.legs_attempted,
                "some price lookups failed"
            );
        }

        info!(
            origins = request.origins.len(),
            candidates = destinations.len(),
            complete = ranked.len(),
            criterion = %request.criterion,
            "destination search finished"
        );

        Ok(SearchResult {
            destinations: ranked,
            criterion: request.criterion,
            legs_attempted: aggregation.legs_attempted,
            legs_priced: aggregation.legs_priced,
            legs_failed: aggregation.legs_failed,
        })
    }
}
