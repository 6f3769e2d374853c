//! Types for critical path extraction and slack analysis.

use serde::Serialize;

use crate::models::{Task, TaskId};

/// The load-bearing dependency chain of a project.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CriticalPathResult {
    /// Tasks of the chain in execution order.
    pub critical_path: Vec<Task>,
    /// Ids of the chain in execution order (parallel to `critical_path`).
    pub path_ids: Vec<TaskId>,
    /// Sum of the chain's durations.
    pub total_duration: i64,
    pub duration_unit: String,
    /// Tasks in or behind a dependency cycle, left out of the search.
    pub excluded: Vec<TaskId>,
}

impl CriticalPathResult {
    pub fn contains(&self, id: &TaskId) -> bool {
        self.path_ids.contains(id)
    }
}

/// Per-task timing from the forward and backward passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskTiming {
    pub task_id: TaskId,
    /// Earliest possible start (longest chain ending before the task).
    pub earliest_start: i64,
    pub earliest_finish: i64,
    /// Latest start that does not push the project past the critical length.
    pub latest_start: i64,
    pub latest_finish: i64,
    /// latest_start - earliest_start.
    pub slack: i64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}

/// Slack of every task that took part in the longest-path search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SlackReport {
    /// Timings in task id order.
    pub timings: Vec<TaskTiming>,
    /// Tasks off the reported path whose slack is within the configured margin.
    pub near_critical: Vec<TaskId>,
}

impl SlackReport {
    pub fn timing(&self, id: &TaskId) -> Option<&TaskTiming> {
        self.timings.iter().find(|t| &t.task_id == id)
    }

    /// Mean slack over all timed tasks, 0 when there are none.
    pub fn average_slack(&self) -> f64 {
        if self.timings.is_empty() {
            return 0.0;
        }
        self.timings.iter().map(|t| t.slack as f64).sum::<f64>() / self.timings.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_timing_critical() {
        let timing = TaskTiming {
            task_id: TaskId::from("a"),
            earliest_start: 0,
            earliest_finish: 5,
            latest_start: 0,
            latest_finish: 5,
            slack: 0,
        };
        assert!(timing.is_critical());

        let with_slack = TaskTiming {
            latest_start: 2,
            latest_finish: 7,
            slack: 2,
            ..timing
        };
        assert!(!with_slack.is_critical());
    }

    #[test]
    fn test_average_slack() {
        assert_eq!(SlackReport::default().average_slack(), 0.0);
    }
}
