//! Task filtering

use super::ComputeError;
use crate::models::Estimate;

/// Get the estimates for one task, keeping their relative order.
///
/// Fails on an empty task id, an empty input list, or when no estimate
/// belongs to the task.
pub fn extract_estimates_for_task<'a>(
    estimates: &'a [Estimate],
    task_id: &str,
) -> Result<Vec<&'a Estimate>, ComputeError> {
    if task_id.is_empty() {
        return Err(ComputeError::EmptyTaskId);
    }
    if estimates.is_empty() {
        return Err(ComputeError::InsufficientData);
    }

    let matching: Vec<&Estimate> = estimates
        .iter()
        .filter(|e| e.work_package_id == task_id)
        .collect();

    if matching.is_empty() {
        return Err(ComputeError::TaskNotFound(task_id.to_string()));
    }

    Ok(matching)
}
