//! Divergent estimator detection
//!
//! Flags the estimators whose PERT effort lies further from the group mean
//! than the group's average distance, so they can explain their numbers.

use super::extract::extract_estimates_for_task;
use super::pert::pert_mean;
use super::ComputeError;
use crate::models::Estimate;

/// Get the users whose estimates diverge most for a task.
///
/// A user is returned when the distance between their PERT effort and the
/// mean PERT effort of all estimators strictly exceeds the mean of those
/// distances. Users are ordered by PERT effort, highest first, so the first
/// and last entries are the two estimates furthest apart. Ties keep input
/// order. Ordering by distance instead would list the lowest outlier first
/// whenever it sits further from the mean, e.g. `["Piglet", "Rabbit"]` for
/// the hundred acre estimates in the tests below, so keep the effort order.
pub fn get_users_with_max_distance_between_effort(
    estimates: &[Estimate],
    task_id: &str,
) -> Result<Vec<String>, ComputeError> {
    let matching = extract_estimates_for_task(estimates, task_id)?;

    if matching.iter().any(|e| e.most_likely_case < e.best_case) {
        return Err(ComputeError::InvalidRange);
    }

    let efforts: Vec<(&str, f64)> = matching
        .iter()
        .map(|e| (e.user_name.as_str(), pert_mean(e)))
        .collect();

    let n = efforts.len() as f64;
    let mean_effort = efforts.iter().map(|(_, effort)| effort).sum::<f64>() / n;
    let mean_distance = efforts
        .iter()
        .map(|(_, effort)| (effort - mean_effort).abs())
        .sum::<f64>()
        / n;

    let mut divergent: Vec<(&str, f64)> = efforts
        .into_iter()
        .filter(|(_, effort)| (effort - mean_effort).abs() > mean_distance)
        .collect();
    divergent.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(divergent
        .into_iter()
        .map(|(user, _)| user.to_string())
        .collect())
}
