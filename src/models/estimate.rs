//! Estimate data types

use serde::{Deserialize, Serialize};

/// Three-point effort estimate submitted by one user for one work package
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Estimate {
    #[serde(rename = "workpackageid")]
    pub work_package_id: String,
    #[serde(rename = "username")]
    pub user_name: String,
    #[serde(default, rename = "bestcase")]
    pub best_case: f64,
    #[serde(default, rename = "mostlikelycase")]
    pub most_likely_case: f64,
    #[serde(default, rename = "worstcase")]
    pub worst_case: f64,
}

impl Estimate {
    pub fn new(
        work_package_id: impl Into<String>,
        user_name: impl Into<String>,
        best_case: f64,
        most_likely_case: f64,
        worst_case: f64,
    ) -> Self {
        Self {
            work_package_id: work_package_id.into(),
            user_name: user_name.into(),
            best_case,
            most_likely_case,
            worst_case,
        }
    }

    /// Whether this estimate belongs to the (work package, user) pair
    pub fn is_for(&self, work_package_id: &str, user_name: &str) -> bool {
        self.work_package_id == work_package_id && self.user_name == user_name
    }
}

/// Aggregated effort for a work package
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffortSummary {
    pub effort: f64,
    #[serde(rename = "standarddeviation")]
    pub standard_deviation: f64,
}

impl EffortSummary {
    pub fn effort(&self) -> f64 {
        self.effort
    }

    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }
}
