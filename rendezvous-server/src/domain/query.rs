//! Price query values sent to the pricing provider.

use chrono::NaiveDate;

use super::IataCode;

/// Default number of travelers per leg.
pub const DEFAULT_TRAVELERS: u8 = 1;

/// Default currency for price searches.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Default number of offers requested per leg.
pub const DEFAULT_MAX_RESULTS: u8 = 5;

/// Provider options shared by every leg of one search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    /// Travelers per leg.
    pub travelers: u8,

    /// ISO 4217 currency code for prices.
    pub currency: String,

    /// Restrict to non-stop flights. `None` leaves the provider default.
    pub non_stop: Option<bool>,

    /// Optional return date (round-trip pricing).
    pub return_date: Option<NaiveDate>,

    /// Maximum number of offers to request.
    pub max_results: u8,
}

impl SearchOptions {
    /// Set the non-stop restriction.
    pub fn with_non_stop(mut self, non_stop: Option<bool>) -> Self {
        self.non_stop = non_stop;
        self
    }

    /// Set the return date.
    pub fn with_return_date(mut self, date: Option<NaiveDate>) -> Self {
        self.return_date = date;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            travelers: DEFAULT_TRAVELERS,
            currency: DEFAULT_CURRENCY.to_string(),
            non_stop: None,
            return_date: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// One leg's price search. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceQuery {
    pub origin: IataCode,
    pub destination: IataCode,
    pub date: NaiveDate,
    pub options: SearchOptions,
}

impl PriceQuery {
    /// Build a query for one origin→destination leg.
    pub fn new(
        origin: IataCode,
        destination: IataCode,
        date: NaiveDate,
        options: SearchOptions,
    ) -> Self {
        Self {
            origin,
            destination,
            date,
            options,
        }
    }
}

/// A provider offer, reduced to what price selection needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    /// Grand total as sent by the provider (a decimal string).
    pub grand_total: String,

    /// Currency of the grand total, when the provider reports one.
    pub currency: Option<String>,
}

impl Offer {
    /// Create an offer with the given grand total.
    pub fn new(grand_total: impl Into<String>) -> Self {
        Self {
            grand_total: grand_total.into(),
            currency: None,
        }
    }

    /// Parse the grand total as a finite, non-negative amount.
    pub fn total(&self) -> Option<f64> {
        self.grand_total
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    }
}
