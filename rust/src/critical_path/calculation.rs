//! Longest-path extraction over the task DAG.
//!
//! Unlike the scheduler, which only answers "when can this start", this pass
//! remembers which predecessor produced each task's maximum so the chain can
//! be rebuilt by walking back from the global maximum.

use std::collections::VecDeque;

use crate::config::AnalysisConfig;
use crate::graph::TaskGraph;
use crate::index::TaskIdx;
use crate::models::TaskId;
use crate::{log_changes, log_debug};

use super::types::CriticalPathResult;

/// Longest cumulative duration ending at every reachable task.
///
/// Built with Kahn's algorithm: a task takes part only once all of its
/// predecessors have, so tasks in a cycle (and everything depending on one)
/// never do and are left out.
#[derive(Clone, Debug)]
pub struct LongestPathPass {
    /// Participating tasks in topological order.
    pub order: Vec<TaskIdx>,
    /// Longest chain duration ending with each task, `None` if excluded.
    pub finish: Vec<Option<i64>>,
    /// Predecessor that produced `finish`, lowest id on ties.
    pub best_pred: Vec<Option<TaskIdx>>,
}

impl LongestPathPass {
    /// Run with task durations as weights.
    pub fn run(graph: &TaskGraph, verbosity: u8) -> Self {
        Self::run_with(graph, verbosity, |idx| graph.duration(idx))
    }

    /// Run with an arbitrary per-task weight (e.g. 1 to count tasks).
    pub fn run_with<F>(graph: &TaskGraph, verbosity: u8, weight: F) -> Self
    where
        F: Fn(TaskIdx) -> i64,
    {
        let n = graph.len();
        let mut in_degree: Vec<usize> = graph
            .indices()
            .map(|idx| graph.predecessors(idx).len())
            .collect();
        let mut queue: VecDeque<TaskIdx> = graph
            .indices()
            .filter(|&idx| in_degree[idx as usize] == 0)
            .collect();

        let mut order = Vec::with_capacity(n);
        let mut finish: Vec<Option<i64>> = vec![None; n];
        let mut best_pred: Vec<Option<TaskIdx>> = vec![None; n];

        while let Some(idx) = queue.pop_front() {
            // Ascending index is ascending id: strict comparison keeps the lowest id on ties.
            let mut preds = graph.predecessors(idx).to_vec();
            preds.sort_unstable();
            let mut best: Option<(TaskIdx, i64)> = None;
            for pred in preds {
                if let Some(value) = finish[pred as usize] {
                    if best.map_or(true, |(_, b)| value > b) {
                        best = Some((pred, value));
                    }
                }
            }

            let base = best.map_or(0, |(_, value)| value);
            let value = base.saturating_add(weight(idx));
            finish[idx as usize] = Some(value);
            best_pred[idx as usize] = best.map(|(pred, _)| pred);
            order.push(idx);
            log_debug!(
                verbosity,
                "longest chain to {} = {} via {:?}",
                graph.task(idx).id,
                value,
                best.map(|(pred, _)| &graph.task(pred).id)
            );

            for &succ in graph.successors(idx) {
                let degree = &mut in_degree[succ as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }

        Self {
            order,
            finish,
            best_pred,
        }
    }

    #[inline]
    pub fn is_participating(&self, idx: TaskIdx) -> bool {
        self.finish[idx as usize].is_some()
    }

    /// Tasks left out of the search, in id order.
    pub fn excluded(&self) -> impl Iterator<Item = TaskIdx> + '_ {
        self.finish
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_none())
            .map(|(i, _)| i as TaskIdx)
    }

    /// Task with the largest cumulative duration, lowest id on ties.
    pub fn best_end(&self) -> Option<(TaskIdx, i64)> {
        let mut best: Option<(TaskIdx, i64)> = None;
        for (i, value) in self.finish.iter().enumerate() {
            if let Some(value) = *value {
                if best.map_or(true, |(_, b)| value > b) {
                    best = Some((i as TaskIdx, value));
                }
            }
        }
        best
    }

    /// Chain ending at `end`, in execution order.
    pub fn chain_to(&self, end: TaskIdx) -> Vec<TaskIdx> {
        let mut chain = vec![end];
        let mut current = end;
        while let Some(pred) = self.best_pred[current as usize] {
            chain.push(pred);
            current = pred;
        }
        chain.reverse();
        chain
    }
}

/// Longest single task, lowest id on ties.
fn longest_task(graph: &TaskGraph) -> Option<(TaskIdx, i64)> {
    let mut best: Option<(TaskIdx, i64)> = None;
    for idx in graph.indices() {
        let duration = graph.duration(idx);
        if best.map_or(true, |(_, b)| duration > b) {
            best = Some((idx, duration));
        }
    }
    best
}

/// Unit of the first task (in id order) that names one.
fn duration_unit(graph: &TaskGraph, default_unit: &str) -> String {
    graph
        .tasks()
        .iter()
        .find_map(|t| t.duration_unit.clone())
        .unwrap_or_else(|| default_unit.to_string())
}

/// Extract the critical path from an existing longest-path pass.
pub fn critical_path_from_pass(
    graph: &TaskGraph,
    pass: &LongestPathPass,
    config: &AnalysisConfig,
) -> CriticalPathResult {
    let chain: Vec<TaskIdx> = match (pass.best_end(), longest_task(graph)) {
        (Some((end, total)), Some((_, longest))) if total >= longest => pass.chain_to(end),
        // A cyclic task alone outweighs every acyclic chain.
        (_, Some((single, _))) => vec![single],
        (_, None) => Vec::new(),
    };

    let excluded: Vec<TaskId> = pass
        .excluded()
        .map(|idx| graph.task(idx).id.clone())
        .collect();
    if !excluded.is_empty() {
        log_changes!(
            config.verbosity,
            "{} task(s) in dependency cycles excluded from the critical path",
            excluded.len()
        );
    }

    let critical_path: Vec<_> = chain.iter().map(|&idx| graph.task(idx).clone()).collect();
    let path_ids = critical_path.iter().map(|t| t.id.clone()).collect();
    let total_duration = critical_path.iter().map(|t| t.duration).sum();

    CriticalPathResult {
        critical_path,
        path_ids,
        total_duration,
        duration_unit: duration_unit(graph, &config.default_duration_unit),
        excluded,
    }
}

/// Compute the critical path of `graph`.
pub fn calculate_critical_path(graph: &TaskGraph, config: &AnalysisConfig) -> CriticalPathResult {
    let pass = LongestPathPass::run(graph, config.verbosity);
    critical_path_from_pass(graph, &pass, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn ids(result: &CriticalPathResult) -> Vec<String> {
        result.path_ids.iter().map(|id| id.to_string()).collect()
    }

    fn run(tasks: Vec<Task>) -> CriticalPathResult {
        calculate_critical_path(&TaskGraph::from_tasks(tasks), &AnalysisConfig::default())
    }

    #[test]
    fn test_fan_out_picks_longer_branch() {
        let result = run(vec![
            Task::new("A", 5),
            Task::new("B", 3).with_predecessors(["A"]),
            Task::new("C", 4).with_predecessors(["A"]),
        ]);

        assert_eq!(ids(&result), vec!["A", "C"]);
        assert_eq!(result.total_duration, 9);
        assert_eq!(result.critical_path.len(), 2);
        assert_eq!(result.critical_path[1].name, "Task C");
        assert_eq!(result.duration_unit, "days");
    }

    #[test]
    fn test_diamond() {
        let result = run(vec![
            Task::new("a", 2),
            Task::new("b", 3).with_predecessors(["a"]),
            Task::new("c", 5).with_predecessors(["a"]),
            Task::new("d", 1).with_predecessors(["b", "c"]),
        ]);

        assert_eq!(ids(&result), vec!["a", "c", "d"]);
        assert_eq!(result.total_duration, 8);
    }

    #[test]
    fn test_tie_prefers_lowest_id() {
        let result = run(vec![
            Task::new("x", 4),
            Task::new("m", 4),
            Task::new("z", 1).with_predecessors(["x", "m"]),
        ]);
        assert_eq!(ids(&result), vec!["m", "z"]);

        // Two equal sinks: the lower id ends the path.
        let result = run(vec![Task::new("q", 3), Task::new("p", 3)]);
        assert_eq!(ids(&result), vec!["p"]);
    }

    #[test]
    fn test_isolated_tasks_give_single_task_path() {
        let result = run(vec![Task::new("a", 2), Task::new("b", 7), Task::new("c", 7)]);
        assert_eq!(ids(&result), vec!["b"]);
        assert_eq!(result.total_duration, 7);
    }

    #[test]
    fn test_empty_graph() {
        let result = run(vec![]);
        assert!(result.critical_path.is_empty());
        assert!(result.path_ids.is_empty());
        assert_eq!(result.total_duration, 0);
    }

    #[test]
    fn test_cycle_excluded() {
        let result = run(vec![
            Task::new("a", 2),
            Task::new("b", 3).with_predecessors(["a"]),
            Task::new("c", 4).with_predecessors(["d"]),
            Task::new("d", 4).with_predecessors(["c"]),
            Task::new("e", 1).with_predecessors(["c"]),
        ]);

        assert_eq!(ids(&result), vec!["a", "b"]);
        assert_eq!(result.total_duration, 5);
        assert_eq!(
            result.excluded,
            vec![TaskId::from("c"), TaskId::from("d"), TaskId::from("e")]
        );
    }

    #[test]
    fn test_cyclic_task_longer_than_any_chain() {
        let result = run(vec![
            Task::new("a", 2),
            Task::new("b", 1).with_predecessors(["a"]),
            Task::new("loop", 9).with_predecessors(["loop"]),
        ]);

        assert_eq!(ids(&result), vec!["loop"]);
        assert_eq!(result.total_duration, 9);
    }

    #[test]
    fn test_all_cyclic_still_terminates() {
        let result = run(vec![
            Task::new("a", 2).with_predecessors(["b"]),
            Task::new("b", 5).with_predecessors(["a"]),
        ]);
        assert_eq!(ids(&result), vec!["b"]);
        assert_eq!(result.excluded.len(), 2);
    }

    #[test]
    fn test_duration_unit_from_first_task() {
        let result = run(vec![
            Task::new("b", 1).with_unit("weeks"),
            Task::new("a", 1),
            Task::new("c", 1).with_unit("hours"),
        ]);
        assert_eq!(result.duration_unit, "weeks");
    }

    #[test]
    fn test_pass_chain_reconstruction() {
        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1),
            Task::new("b", 2).with_predecessors(["a"]),
            Task::new("c", 3).with_predecessors(["b"]),
        ]);
        let pass = LongestPathPass::run(&graph, 0);

        assert_eq!(pass.best_end(), Some((2, 6)));
        assert_eq!(pass.chain_to(2), vec![0, 1, 2]);
        assert_eq!(pass.order, vec![0, 1, 2]);
        assert_eq!(pass.excluded().count(), 0);

        let counted = LongestPathPass::run_with(&graph, 0, |_| 1);
        assert_eq!(counted.best_end(), Some((2, 3)));
    }
}
