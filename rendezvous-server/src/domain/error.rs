//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from API/IO errors.

use super::IataCode;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A destination was scored with no legs at all
    #[error("destination {0} has no legs")]
    NoLegs(IataCode),

    /// A destination was scored with a leg that has no price
    #[error("destination {destination} is incomplete: no price from {origin}")]
    IncompleteDestination {
        destination: IataCode,
        origin: IataCode,
    },
}
