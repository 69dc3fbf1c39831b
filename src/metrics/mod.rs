//! Estimate aggregation
//!
//! Pure functions over caller-supplied estimate lists; nothing here touches
//! storage. Provides:
//! - Task filtering with input validation
//! - PERT effort and spread averaging
//! - Detection of estimators far from the group mean

pub mod extract;
pub mod outliers;
pub mod pert;

pub use extract::extract_estimates_for_task;
pub use outliers::get_users_with_max_distance_between_effort;
pub use pert::{calculate_average_estimate, pert_mean, pert_spread};

use thiserror::Error;

use crate::error::ErrorKind;

/// Aggregation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    #[error("Task ID cannot be empty")]
    EmptyTaskId,

    #[error("Not enough data to process")]
    InsufficientData,

    #[error("Specified task with ID: {0} is not part of estimates")]
    TaskNotFound(String),

    #[error("Most Likely was smaller than Best Effort")]
    InvalidRange,
}

impl ComputeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTaskId => ErrorKind::InvalidArgument,
            Self::InsufficientData => ErrorKind::InsufficientData,
            Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::InvalidRange => ErrorKind::InvalidRange,
        }
    }
}
