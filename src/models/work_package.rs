//! Work package data types

use serde::{Deserialize, Serialize};

/// A unit of work being estimated within a session.
///
/// `effort` and `standard_deviation` hold the facilitator-confirmed result;
/// they are set explicitly and never derived from the raw estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPackage {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub effort: f64,
    #[serde(default, rename = "standarddeviation")]
    pub standard_deviation: f64,
}

impl WorkPackage {
    /// Create a work package with zero effort
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            effort: 0.0,
            standard_deviation: 0.0,
        }
    }

    /// Overwrite the confirmed effort values
    pub fn set_estimate(&mut self, effort: f64, standard_deviation: f64) {
        self.effort = effort;
        self.standard_deviation = standard_deviation;
    }

    /// Reset the confirmed effort values to zero
    pub fn clear_estimate(&mut self) {
        self.set_estimate(0.0, 0.0);
    }
}
