//! Backward pass: latest start/finish and slack per task.

use crate::graph::TaskGraph;
use crate::log_checks;

use super::calculation::LongestPathPass;
use super::types::{CriticalPathResult, SlackReport, TaskTiming};

/// Compute slack for every task that took part in `pass`.
///
/// Sinks must finish by the critical path length; every other task must
/// finish before its earliest-starting successor's latest start. Successors
/// that were excluded from the pass impose no constraint.
pub fn compute_slack(
    graph: &TaskGraph,
    pass: &LongestPathPass,
    critical: &CriticalPathResult,
    near_critical_slack: i64,
    verbosity: u8,
) -> SlackReport {
    let horizon = critical.total_duration;
    let mut latest_start: Vec<Option<i64>> = vec![None; graph.len()];

    for &idx in pass.order.iter().rev() {
        let latest_finish = graph
            .successors(idx)
            .iter()
            .filter_map(|&succ| latest_start[succ as usize])
            .min()
            .unwrap_or(horizon);
        latest_start[idx as usize] = Some(latest_finish - graph.duration(idx));
    }

    let mut timings = Vec::with_capacity(pass.order.len());
    let mut near_critical = Vec::new();
    for idx in graph.indices() {
        let (Some(earliest_finish), Some(latest_start)) =
            (pass.finish[idx as usize], latest_start[idx as usize])
        else {
            continue;
        };
        let task = graph.task(idx);
        let earliest_start = earliest_finish - task.duration;
        let timing = TaskTiming {
            task_id: task.id.clone(),
            earliest_start,
            earliest_finish,
            latest_start,
            latest_finish: latest_start + task.duration,
            slack: latest_start - earliest_start,
        };

        if !critical.contains(&task.id) && timing.slack <= near_critical_slack {
            log_checks!(verbosity, "{} is near-critical (slack {})", task.id, timing.slack);
            near_critical.push(task.id.clone());
        }
        timings.push(timing);
    }

    SlackReport {
        timings,
        near_critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::critical_path::critical_path_from_pass;
    use crate::models::{Task, TaskId};

    fn analyze(tasks: Vec<Task>) -> (CriticalPathResult, SlackReport) {
        let graph = TaskGraph::from_tasks(tasks);
        let config = AnalysisConfig::default();
        let pass = LongestPathPass::run(&graph, 0);
        let critical = critical_path_from_pass(&graph, &pass, &config);
        let slack = compute_slack(&graph, &pass, &critical, config.near_critical_slack, 0);
        (critical, slack)
    }

    #[test]
    fn test_parallel_paths_with_slack() {
        // b is on the critical path, a has 3 units of slack.
        let (_, report) = analyze(vec![
            Task::new("a", 2),
            Task::new("b", 5),
            Task::new("target", 1).with_predecessors(["a", "b"]),
        ]);

        let a = report.timing(&TaskId::from("a")).unwrap();
        assert_eq!(a.slack, 3);
        assert_eq!(a.latest_start, 3);
        assert_eq!(a.latest_finish, 5);
        assert!(report.timing(&TaskId::from("b")).unwrap().is_critical());
        assert!(report.timing(&TaskId::from("target")).unwrap().is_critical());
        assert!(report.near_critical.is_empty());
    }

    #[test]
    fn test_near_critical_tasks() {
        let (critical, report) = analyze(vec![
            Task::new("a", 2),
            Task::new("b", 3).with_predecessors(["a"]),
            Task::new("c", 5).with_predecessors(["a"]),
            Task::new("d", 1).with_predecessors(["b", "c"]),
        ]);

        assert_eq!(critical.total_duration, 8);
        assert_eq!(report.timing(&TaskId::from("b")).unwrap().slack, 2);
        assert_eq!(report.near_critical, vec![TaskId::from("b")]);
        assert!((report.average_slack() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_excluded_tasks_have_no_timing() {
        let (_, report) = analyze(vec![
            Task::new("a", 4),
            Task::new("b", 1).with_predecessors(["c"]),
            Task::new("c", 1).with_predecessors(["b"]),
        ]);

        assert_eq!(report.timings.len(), 1);
        assert!(report.timing(&TaskId::from("b")).is_none());
        assert!(report.timing(&TaskId::from("a")).unwrap().is_critical());
    }

    #[test]
    fn test_isolated_short_task_has_slack() {
        let (_, report) = analyze(vec![Task::new("long", 10), Task::new("short", 4)]);
        assert_eq!(report.timing(&TaskId::from("short")).unwrap().slack, 6);
        assert!(report.near_critical.is_empty());
    }
}
