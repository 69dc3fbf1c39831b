//! Session data types
//!
//! A session is persisted as one document; every mutation rewrites the whole
//! document inside the store's per-token critical section.

use serde::{Deserialize, Serialize};

use super::estimate::Estimate;
use super::work_package::WorkPackage;

/// Full session document as stored in the `sessions` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub token: String,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default, rename = "workpackages")]
    pub work_packages: Vec<WorkPackage>,
    #[serde(default)]
    pub estimates: Vec<Estimate>,
    pub created_at: String,
    pub updated_at: String,
}

impl SessionDocument {
    /// Create an empty session for a freshly issued token
    pub fn new(token: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();

        Self {
            token: token.into(),
            users: Vec::new(),
            work_packages: Vec::new(),
            estimates: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    pub fn has_user(&self, user_name: &str) -> bool {
        self.users.iter().any(|u| u == user_name)
    }

    pub fn work_package(&self, id: &str) -> Option<&WorkPackage> {
        self.work_packages.iter().find(|wp| wp.id == id)
    }

    pub fn work_package_mut(&mut self, id: &str) -> Option<&mut WorkPackage> {
        self.work_packages.iter_mut().find(|wp| wp.id == id)
    }

    /// Position of the estimate for the (work package, user) pair
    pub fn estimate_position(&self, work_package_id: &str, user_name: &str) -> Option<usize> {
        self.estimates
            .iter()
            .position(|e| e.is_for(work_package_id, user_name))
    }

    /// Insert an estimate, replacing the pair's previous one in place
    pub fn upsert_estimate(&mut self, estimate: Estimate) {
        match self.estimate_position(&estimate.work_package_id, &estimate.user_name) {
            Some(idx) => self.estimates[idx] = estimate,
            None => self.estimates.push(estimate),
        }
    }
}
