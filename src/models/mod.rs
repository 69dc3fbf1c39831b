//! Data models module
//!
//! Contains the documents persisted by the session store and the values
//! exchanged with the estimate aggregator:
//! - Session documents
//! - Work packages
//! - Estimates and effort summaries

pub mod estimate;
pub mod session;
pub mod work_package;

pub use estimate::{EffortSummary, Estimate};
pub use session::SessionDocument;
pub use work_package::WorkPackage;
