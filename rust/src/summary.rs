//! Project-level summary figures.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::graph::{Project, TaskGraph};
use crate::models::TaskStatus;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub delayed: usize,
    /// Tasks whose status label is not one of the four above.
    pub other: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub project_name: String,
    pub manager: Option<String>,
    pub task_count: usize,
    pub status_counts: StatusCounts,
    /// Completed tasks over all tasks, in percent, one decimal.
    pub completion_percentage: f64,
    /// Sum of effective durations, ignoring parallelism.
    pub total_duration: i64,
    pub duration_unit: String,
    /// Resource name → number of tasks using it.
    pub resource_allocation: BTreeMap<String, usize>,
}

impl ProjectSummary {
    pub fn from_project(project: &Project, default_unit: &str) -> Self {
        summarize(
            &project.name,
            project.manager.clone(),
            &project.graph,
            default_unit,
        )
    }
}

/// Most frequent unit, first seen (id order) on ties.
fn dominant_unit(graph: &TaskGraph) -> Option<String> {
    let mut counts: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
    for (position, task) in graph.tasks().iter().enumerate() {
        if let Some(unit) = task.duration_unit.as_deref() {
            counts.entry(unit).or_insert((0, position)).0 += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(unit, _)| unit.to_string())
}

pub fn summarize(
    name: &str,
    manager: Option<String>,
    graph: &TaskGraph,
    default_unit: &str,
) -> ProjectSummary {
    let mut status_counts = StatusCounts::default();
    let mut resource_allocation: BTreeMap<String, usize> = BTreeMap::new();
    for task in graph.tasks() {
        match task.status {
            TaskStatus::NotStarted => status_counts.not_started += 1,
            TaskStatus::InProgress => status_counts.in_progress += 1,
            TaskStatus::Completed => status_counts.completed += 1,
            TaskStatus::Delayed => status_counts.delayed += 1,
            TaskStatus::Other(_) => status_counts.other += 1,
        }
        for resource in &task.resources {
            *resource_allocation.entry(resource.clone()).or_default() += 1;
        }
    }

    let completion_percentage = if graph.is_empty() {
        0.0
    } else {
        let raw = status_counts.completed as f64 * 100.0 / graph.len() as f64;
        (raw * 10.0).round() / 10.0
    };

    ProjectSummary {
        project_name: name.to_string(),
        manager,
        task_count: graph.len(),
        status_counts,
        completion_percentage,
        total_duration: graph.tasks().iter().map(|t| t.duration).sum(),
        duration_unit: dominant_unit(graph).unwrap_or_else(|| default_unit.to_string()),
        resource_allocation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    #[test]
    fn test_summary_counts() {
        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 2)
                .with_status(TaskStatus::Completed)
                .with_resources(["dev"]),
            Task::new("b", 3)
                .with_status(TaskStatus::InProgress)
                .with_resources(["dev", "qa"]),
            Task::new("c", 4).with_status(TaskStatus::Other("blocked".into())),
        ]);
        let summary = summarize("Launch", Some("Sam".into()), &graph, "days");

        assert_eq!(summary.task_count, 3);
        assert_eq!(summary.status_counts.completed, 1);
        assert_eq!(summary.status_counts.in_progress, 1);
        assert_eq!(summary.status_counts.other, 1);
        assert_eq!(summary.completion_percentage, 33.3);
        assert_eq!(summary.total_duration, 9);
        assert_eq!(summary.duration_unit, "days");
        let allocation: Vec<_> = summary
            .resource_allocation
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(allocation, vec![("dev", 2), ("qa", 1)]);
    }

    #[test]
    fn test_dominant_unit() {
        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1).with_unit("hours"),
            Task::new("b", 1).with_unit("weeks"),
            Task::new("c", 1).with_unit("weeks"),
            Task::new("d", 1).with_unit("hours"),
            Task::new("e", 1),
        ]);
        // Tie at two each: "hours" is seen first.
        assert_eq!(dominant_unit(&graph).as_deref(), Some("hours"));

        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1).with_unit("hours"),
            Task::new("b", 1).with_unit("weeks"),
            Task::new("c", 1).with_unit("weeks"),
        ]);
        assert_eq!(dominant_unit(&graph).as_deref(), Some("weeks"));
    }

    #[test]
    fn test_empty_project() {
        let summary = summarize("Untitled Project", None, &TaskGraph::default(), "days");
        assert_eq!(summary.task_count, 0);
        assert_eq!(summary.completion_percentage, 0.0);
        assert_eq!(summary.total_duration, 0);
        assert!(summary.resource_allocation.is_empty());
    }
}
