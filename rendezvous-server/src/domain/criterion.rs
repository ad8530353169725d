//! Optimization criteria for ranking destinations.

use std::fmt;

use serde::Serialize;

/// The axis a group optimizes for when ranking destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationCriterion {
    /// Cheapest total for the whole group.
    #[default]
    Total,
    /// Most evenly shared cost.
    Fairness,
    /// Lowest CO2 proxy.
    Co2,
}

impl OptimizationCriterion {
    /// Parse a criterion name, case-insensitively.
    ///
    /// Unrecognized names fall back to [`OptimizationCriterion::Total`].
    pub fn from_param(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "fairness" => OptimizationCriterion::Fairness,
            "co2" => OptimizationCriterion::Co2,
            _ => OptimizationCriterion::Total,
        }
    }

    /// The wire name of this criterion.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationCriterion::Total => "total",
            OptimizationCriterion::Fairness => "fairness",
            OptimizationCriterion::Co2 => "co2",
        }
    }
}

impl fmt::Display for OptimizationCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!(
            OptimizationCriterion::from_param("total"),
            OptimizationCriterion::Total
        );
        assert_eq!(
            OptimizationCriterion::from_param("fairness"),
            OptimizationCriterion::Fairness
        );
        assert_eq!(
            OptimizationCriterion::from_param(" CO2 "),
            OptimizationCriterion::Co2
        );
    }

    #[test]
    fn unknown_falls_back_to_total() {
        assert_eq!(
            OptimizationCriterion::from_param("cheapest"),
            OptimizationCriterion::Total
        );
        assert_eq!(
            OptimizationCriterion::from_param(""),
            OptimizationCriterion::Total
        );
    }

    #[test]
    fn default_is_total() {
        assert_eq!(
            OptimizationCriterion::default(),
            OptimizationCriterion::Total
        );
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&OptimizationCriterion::Co2).unwrap();
        assert_eq!(json, "\"co2\"");
    }
}
