//! Critical path extraction.
//!
//! A longest-path pass over the task DAG finds the chain whose summed
//! duration bounds project completion. A backward pass over the same order
//! then derives latest start/finish and slack for every task.

mod calculation;
mod slack;
mod types;

pub use calculation::{calculate_critical_path, critical_path_from_pass, LongestPathPass};
pub use slack::compute_slack;
pub use types::{CriticalPathResult, SlackReport, TaskTiming};
