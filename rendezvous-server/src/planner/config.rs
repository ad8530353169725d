//! Planner configuration.

use crate::domain::{IataCode, SearchOptions};

/// Candidate destinations searched when a request names none.
pub const DEFAULT_DESTINATIONS: [&str; 10] = [
    "LIS", "BCN", "MAD", "CDG", "FCO", "LHR", "AMS", "BER", "PRG", "VIE",
];

/// What to do when a leg fails to authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFailurePolicy {
    /// Record the leg as unpriced and keep searching.
    #[default]
    Contain,
    /// Abort the whole search on the first auth failure.
    FailFast,
}

/// Configuration parameters for destination search.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Destinations searched when the request does not name any.
    pub destinations: Vec<IataCode>,

    /// Maximum number of leg lookups in flight for one search.
    /// 1 prices legs strictly one at a time.
    pub max_concurrent_legs: usize,

    /// Handling of authentication failures.
    pub auth_failures: AuthFailurePolicy,

    /// Provider options applied to every leg.
    pub options: SearchOptions,
}

impl PlannerConfig {
    /// The built-in candidate set, parsed.
    pub fn default_destinations() -> Vec<IataCode> {
        DEFAULT_DESTINATIONS
            .iter()
            .filter_map(|code| IataCode::parse(code).ok())
            .collect()
    }

    /// Replace the default candidate set. An empty list keeps the built-in one.
    pub fn with_destinations(mut self, destinations: Vec<IataCode>) -> Self {
        if !destinations.is_empty() {
            self.destinations = destinations;
        }
        self
    }

    /// Set the leg concurrency (at least 1).
    pub fn with_max_concurrent_legs(mut self, n: usize) -> Self {
        self.max_concurrent_legs = n.max(1);
        self
    }

    /// Set the auth failure policy.
    pub fn with_auth_failures(mut self, policy: AuthFailurePolicy) -> Self {
        self.auth_failures = policy;
        self
    }

    /// Set the provider options.
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            destinations: Self::default_destinations(),
            max_concurrent_legs: 4,
            auth_failures: AuthFailurePolicy::Contain,
            options: SearchOptions::default(),
        }
    }
}
