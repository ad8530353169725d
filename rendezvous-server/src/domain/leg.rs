//! Leg results: one priced (or unpriced) origin→destination lookup.

use std::fmt;

use serde::Serialize;

use super::IataCode;

/// Why a leg has no usable price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegIssueKind {
    /// Origin and destination are the same airport; never looked up.
    SameAirport,
    /// The provider answered but returned no offers.
    NoOffers,
    /// The offers body was malformed, or no offer had a parseable grand total.
    UnparseablePrice,
    /// Provider credentials are not configured.
    AuthConfig,
    /// The token exchange failed.
    AuthUpstream,
    /// The price search itself failed in transport or with an error status.
    Upstream,
}

impl LegIssueKind {
    /// Whether this kind means a provider call failed, as opposed to the
    /// route genuinely having no price.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LegIssueKind::AuthConfig | LegIssueKind::AuthUpstream | LegIssueKind::Upstream
        )
    }

    /// Whether this kind is an authentication problem.
    pub fn is_auth(&self) -> bool {
        matches!(self, LegIssueKind::AuthConfig | LegIssueKind::AuthUpstream)
    }
}

impl fmt::Display for LegIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LegIssueKind::SameAirport => "same airport",
            LegIssueKind::NoOffers => "no offers",
            LegIssueKind::UnparseablePrice => "unparseable price",
            LegIssueKind::AuthConfig => "auth not configured",
            LegIssueKind::AuthUpstream => "auth exchange failed",
            LegIssueKind::Upstream => "upstream error",
        };
        f.write_str(s)
    }
}

/// Tagged reason attached to an unpriced leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegIssue {
    pub kind: LegIssueKind,
    pub reason: String,
}

/// The outcome of pricing one origin for a destination.
///
/// Exactly one of `price` and `issue` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegResult {
    origin: IataCode,
    price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issue: Option<LegIssue>,
}

impl LegResult {
    /// A leg with a usable price.
    pub fn priced(origin: IataCode, price: f64) -> Self {
        Self {
            origin,
            price: Some(price),
            issue: None,
        }
    }

    /// A leg without a usable price.
    pub fn unpriced(origin: IataCode, kind: LegIssueKind, reason: impl Into<String>) -> Self {
        Self {
            origin,
            price: None,
            issue: Some(LegIssue {
                kind,
                reason: reason.into(),
            }),
        }
    }

    pub fn origin(&self) -> IataCode {
        self.origin
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn issue(&self) -> Option<&LegIssue> {
        self.issue.as_ref()
    }

    pub fn is_priced(&self) -> bool {
        self.price.is_some()
    }
}
