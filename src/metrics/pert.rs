//! PERT effort calculations
//!
//! Per estimator:
//! - mean = (best + 4 * most likely + worst) / 6
//! - spread = (worst - best) / 6
//!
//! A task's summary is the plain average of the per-estimator values, not a
//! single PERT over pooled best/likely/worst figures.

use super::extract::extract_estimates_for_task;
use super::ComputeError;
use crate::models::{EffortSummary, Estimate};

/// PERT expected effort of one estimate
pub fn pert_mean(estimate: &Estimate) -> f64 {
    (estimate.best_case + 4.0 * estimate.most_likely_case + estimate.worst_case) / 6.0
}

/// PERT standard deviation of one estimate
pub fn pert_spread(estimate: &Estimate) -> f64 {
    (estimate.worst_case - estimate.best_case) / 6.0
}

/// Average PERT effort and spread across all estimators of a task
pub fn calculate_average_estimate(
    estimates: &[Estimate],
    task_id: &str,
) -> Result<EffortSummary, ComputeError> {
    let matching = extract_estimates_for_task(estimates, task_id)?;
    let n = matching.len() as f64;

    let effort = matching.iter().map(|e| pert_mean(e)).sum::<f64>() / n;
    let standard_deviation = matching.iter().map(|e| pert_spread(e)).sum::<f64>() / n;

    Ok(EffortSummary {
        effort,
        standard_deviation,
    })
}
