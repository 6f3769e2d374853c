//! Independent structural risk rules.
//!
//! Each rule is a pure function of the graph plus the set of critical task
//! indices; rules never see each other's output.

use std::collections::BTreeMap;

use crate::critical_path::LongestPathPass;
use crate::graph::TaskGraph;
use crate::index::TaskIdx;
use crate::log_debug;

use super::types::{
    Bottleneck, DependencyChainRisk, FlaggedTask, OverloadedResource, ResourceConflict, Severity,
    TimelineRisk,
};

/// Predecessor or resource count above which a task counts as complex.
pub const COMPLEX_TASK_LINKS: usize = 2;
/// Durations below this are suspicious for a complex task.
pub const SHORT_DURATION: i64 = 3;
/// Chains with more tasks than this are flagged.
pub const LONG_CHAIN_TASKS: i64 = 5;

fn severity_for(critical: &[bool], idx: TaskIdx) -> Severity {
    if critical[idx as usize] {
        Severity::High
    } else {
        Severity::Medium
    }
}

pub fn no_resources(graph: &TaskGraph, critical: &[bool]) -> Vec<FlaggedTask> {
    graph
        .indices()
        .filter(|&idx| graph.task(idx).resources.is_empty())
        .map(|idx| FlaggedTask {
            task: graph.task(idx).clone(),
            severity: severity_for(critical, idx),
        })
        .collect()
}

/// Tasks without predecessors. A single-task project is exempt.
pub fn no_dependencies(graph: &TaskGraph) -> Vec<FlaggedTask> {
    if graph.len() <= 1 {
        return Vec::new();
    }
    graph
        .indices()
        .filter(|&idx| graph.predecessors(idx).is_empty())
        .map(|idx| FlaggedTask {
            task: graph.task(idx).clone(),
            severity: Severity::Low,
        })
        .collect()
}

pub fn bottlenecks(graph: &TaskGraph, critical: &[bool], multiplier: f64) -> Vec<Bottleneck> {
    if graph.is_empty() {
        return Vec::new();
    }
    let total: i64 = graph.tasks().iter().map(|t| t.duration).sum();
    let average = total as f64 / graph.len() as f64;
    let threshold = average * multiplier;

    graph
        .indices()
        .filter(|&idx| graph.duration(idx) as f64 > threshold)
        .map(|idx| {
            let task = graph.task(idx);
            Bottleneck {
                duration_ratio: task.duration as f64 / average,
                average_duration: average,
                severity: severity_for(critical, idx),
                task: task.clone(),
            }
        })
        .collect()
}

/// Tasks per resource, resources sorted by name, tasks in id order.
fn tasks_by_resource(graph: &TaskGraph) -> BTreeMap<&str, Vec<TaskIdx>> {
    let mut by_resource: BTreeMap<&str, Vec<TaskIdx>> = BTreeMap::new();
    for idx in graph.indices() {
        for resource in &graph.task(idx).resources {
            by_resource.entry(resource.as_str()).or_default().push(idx);
        }
    }
    by_resource
}

fn directly_linked(graph: &TaskGraph, a: TaskIdx, b: TaskIdx) -> bool {
    graph.predecessors(a).contains(&b) || graph.predecessors(b).contains(&a)
}

/// Resources shared by tasks that may run in parallel.
///
/// Tasks of one resource are grouped greedily in id order: the first
/// remaining task seeds a group and takes every remaining task not directly
/// linked to it. Every group of two or more is a conflict.
pub fn resource_conflicts(graph: &TaskGraph, critical: &[bool]) -> Vec<ResourceConflict> {
    let mut conflicts = Vec::new();
    for (resource, tasks) in tasks_by_resource(graph) {
        let mut remaining = tasks;
        while !remaining.is_empty() {
            let seed = remaining.remove(0);
            let (mut group, rest): (Vec<TaskIdx>, Vec<TaskIdx>) = remaining
                .into_iter()
                .partition(|&other| !directly_linked(graph, seed, other));
            remaining = rest;
            if group.is_empty() {
                continue;
            }
            group.insert(0, seed);

            let critical_tasks = group.iter().filter(|&&idx| critical[idx as usize]).count();
            conflicts.push(ResourceConflict {
                resource: resource.to_string(),
                conflicting_tasks: group.iter().map(|&idx| graph.task(idx).clone()).collect(),
                critical_tasks,
                severity: if critical_tasks > 0 {
                    Severity::High
                } else {
                    Severity::Medium
                },
            });
        }
    }
    conflicts
}

/// Resources assigned to more than `threshold` tasks, sorted by name.
pub fn overloaded_resources(
    graph: &TaskGraph,
    critical: &[bool],
    threshold: usize,
) -> Vec<OverloadedResource> {
    tasks_by_resource(graph)
        .into_iter()
        .filter(|(_, tasks)| tasks.len() > threshold)
        .map(|(resource, tasks)| {
            let critical_tasks = tasks.iter().filter(|&&idx| critical[idx as usize]).count();
            OverloadedResource {
                resource: resource.to_string(),
                task_count: tasks.len(),
                tasks: tasks.iter().map(|&idx| graph.task(idx).clone()).collect(),
                critical_tasks,
                severity: if critical_tasks > 0 {
                    Severity::High
                } else {
                    Severity::Medium
                },
            }
        })
        .collect()
}

/// Complex tasks (many predecessors or resources) with a short estimate.
pub fn timeline_risks(graph: &TaskGraph, critical: &[bool]) -> Vec<TimelineRisk> {
    let mut risks = Vec::new();
    for idx in graph.indices() {
        let task = graph.task(idx);
        if task.duration >= SHORT_DURATION {
            continue;
        }
        let preds = graph.predecessors(idx).len();
        let resources = task.resources.len();
        let reason = if preds > COMPLEX_TASK_LINKS {
            format!(
                "{} predecessors but only {} {} estimated",
                preds,
                task.duration,
                task.duration_unit.as_deref().unwrap_or("units")
            )
        } else if resources > COMPLEX_TASK_LINKS {
            format!(
                "{} resources but only {} {} estimated",
                resources,
                task.duration,
                task.duration_unit.as_deref().unwrap_or("units")
            )
        } else {
            continue;
        };
        risks.push(TimelineRisk {
            task: task.clone(),
            severity: severity_for(critical, idx),
            reason,
        });
    }
    risks
}

/// Tasks ending a predecessor chain of more than [`LONG_CHAIN_TASKS`] tasks.
pub fn long_dependency_chains(
    graph: &TaskGraph,
    critical: &[bool],
    verbosity: u8,
) -> Vec<DependencyChainRisk> {
    let counted = LongestPathPass::run_with(graph, verbosity, |_| 1);
    graph
        .indices()
        .filter(|&idx| counted.finish[idx as usize].is_some_and(|n| n > LONG_CHAIN_TASKS))
        .map(|idx| {
            let task = graph.task(idx);
            let chain = counted.chain_to(idx);
            log_debug!(verbosity, "task {} ends a chain of {} tasks", task.id, chain.len());
            DependencyChainRisk {
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                dependency_chain: chain.iter().map(|&i| graph.task(i).id.clone()).collect(),
                severity: severity_for(critical, idx),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskId};

    fn none_critical(graph: &TaskGraph) -> Vec<bool> {
        vec![false; graph.len()]
    }

    #[test]
    fn test_no_resources_severity_follows_critical_path() {
        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1),
            Task::new("b", 1).with_resources(["dev"]),
            Task::new("c", 1),
        ]);
        let critical = vec![true, false, false];

        let flagged = no_resources(&graph, &critical);
        let summary: Vec<_> = flagged
            .iter()
            .map(|f| (f.task.id.to_string(), f.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a".to_string(), Severity::High),
                ("c".to_string(), Severity::Medium)
            ]
        );
    }

    #[test]
    fn test_no_dependencies_skips_single_task() {
        let single = TaskGraph::from_tasks(vec![Task::new("a", 1)]);
        assert!(no_dependencies(&single).is_empty());

        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1),
            Task::new("b", 1).with_predecessors(["a"]),
            Task::new("c", 1),
        ]);
        let flagged = no_dependencies(&graph);
        assert_eq!(flagged.len(), 2);
        assert!(flagged.iter().all(|f| f.severity == Severity::Low));
        assert_eq!(flagged[1].task.id, TaskId::from("c"));
    }

    #[test]
    fn test_bottleneck_threshold() {
        // Mean is 4, threshold 6: only the 10 qualifies.
        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1),
            Task::new("b", 2),
            Task::new("c", 3),
            Task::new("d", 10),
        ]);
        let found = bottlenecks(&graph, &none_critical(&graph), 1.5);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].task.id, TaskId::from("d"));
        assert_eq!(found[0].average_duration, 4.0);
        assert_eq!(found[0].duration_ratio, 2.5);
        assert_eq!(found[0].severity, Severity::Medium);

        // Uniform durations never exceed the mean.
        let flat = TaskGraph::from_tasks(vec![Task::new("a", 2), Task::new("b", 2)]);
        assert!(bottlenecks(&flat, &none_critical(&flat), 1.5).is_empty());
        assert!(bottlenecks(&TaskGraph::default(), &[], 1.5).is_empty());
    }

    #[test]
    fn test_overloaded_resource() {
        let tasks: Vec<Task> = (1..=5)
            .map(|n| Task::new(TaskId::Num(n), 1).with_resources(["X"]))
            .chain([Task::new(TaskId::Num(6), 1).with_resources(["Y"])])
            .collect();
        let graph = TaskGraph::from_tasks(tasks);
        let mut critical = none_critical(&graph);

        let found = overloaded_resources(&graph, &critical, 3);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].resource, "X");
        assert_eq!(found[0].task_count, 5);
        assert_eq!(found[0].tasks.len(), 5);
        assert_eq!(found[0].severity, Severity::Medium);

        critical[2] = true;
        let found = overloaded_resources(&graph, &critical, 3);
        assert_eq!(found[0].critical_tasks, 1);
        assert_eq!(found[0].severity, Severity::High);

        assert!(overloaded_resources(&graph, &critical, 5).is_empty());
    }

    #[test]
    fn test_timeline_risk() {
        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1),
            Task::new("b", 1),
            Task::new("c", 1),
            Task::new("join", 2)
                .with_predecessors(["a", "b", "c"])
                .with_unit("days"),
            Task::new("crowded", 1).with_resources(["p", "q", "r"]),
            Task::new("slow", 5).with_resources(["p", "q", "r"]),
        ]);
        let found = timeline_risks(&graph, &none_critical(&graph));
        let ids: Vec<_> = found.iter().map(|r| r.task.id.to_string()).collect();
        assert_eq!(ids, vec!["crowded", "join"]);
        assert_eq!(found[1].reason, "3 predecessors but only 2 days estimated");
    }

    #[test]
    fn test_long_chain() {
        let names = ["t1", "t2", "t3", "t4", "t5", "t6", "t7"];
        let tasks: Vec<Task> = names
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let task = Task::new(name, 1);
                if i == 0 {
                    task
                } else {
                    task.with_predecessors([names[i - 1]])
                }
            })
            .collect();
        let graph = TaskGraph::from_tasks(tasks);

        let found = long_dependency_chains(&graph, &none_critical(&graph), 0);
        let ids: Vec<_> = found.iter().map(|r| r.task_id.to_string()).collect();
        assert_eq!(ids, vec!["t6", "t7"]);
        assert_eq!(found[1].dependency_chain.len(), 7);
        assert_eq!(found[1].dependency_chain[0], TaskId::from("t1"));
    }

    #[test]
    fn test_resource_conflicts_group_independent_tasks() {
        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1).with_resources(["dev"]),
            Task::new("b", 1).with_resources(["dev"]).with_predecessors(["a"]),
            Task::new("c", 1).with_resources(["dev"]),
            Task::new("d", 1).with_resources(["dev", "qa"]).with_predecessors(["c"]),
            Task::new("e", 1).with_resources(["qa"]).with_predecessors(["d"]),
        ]);
        let mut critical = none_critical(&graph);
        critical[1] = true;

        let found = resource_conflicts(&graph, &critical);
        let groups: Vec<(String, Vec<String>)> = found
            .iter()
            .map(|c| {
                (
                    c.resource.clone(),
                    c.conflicting_tasks.iter().map(|t| t.id.to_string()).collect(),
                )
            })
            .collect();
        // dev: a seeds {a, c, d}; b is left alone. qa: d and e are linked.
        assert_eq!(
            groups,
            vec![(
                "dev".to_string(),
                vec!["a".to_string(), "c".to_string(), "d".to_string()]
            )]
        );
        assert_eq!(found[0].critical_tasks, 0);
        assert_eq!(found[0].severity, Severity::Medium);

        critical[2] = true;
        let found = resource_conflicts(&graph, &critical);
        assert_eq!(found[0].critical_tasks, 1);
        assert_eq!(found[0].severity, Severity::High);
    }

    #[test]
    fn test_resource_conflicts_need_shared_resource() {
        let graph = TaskGraph::from_tasks(vec![
            Task::new("a", 1).with_resources(["dev"]),
            Task::new("b", 1).with_resources(["ops"]),
        ]);
        assert!(resource_conflicts(&graph, &none_critical(&graph)).is_empty());
    }
}
