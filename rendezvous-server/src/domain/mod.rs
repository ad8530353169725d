//! Domain types for the group destination finder.
//!
//! This module contains the core value types shared by the provider client
//! and the planner. Codes are validated at construction time, so code that
//! receives these types can trust their validity.

mod airport;
mod criterion;
mod error;
mod leg;
mod query;

pub use airport::{IataCode, InvalidIataCode};
pub use criterion::OptimizationCriterion;
pub use error::DomainError;
pub use leg::{LegIssue, LegIssueKind, LegResult};
pub use query::{
    DEFAULT_CURRENCY, DEFAULT_MAX_RESULTS, DEFAULT_TRAVELERS, Offer, PriceQuery, SearchOptions,
};
