//! Human-readable advice derived from the flagged risks.

use std::collections::BTreeSet;

use crate::models::TaskId;

use super::types::RiskCategories;

/// One message family per triggered category, in a fixed order.
pub fn recommend(
    risks: &RiskCategories,
    is_critical: impl Fn(&TaskId) -> bool,
    severe_overload_threshold: usize,
) -> Vec<String> {
    let mut out = Vec::new();

    match risks.no_resources.as_slice() {
        [] => {}
        [only] => out.push(format!(
            "Assign resources to task '{}' which currently has none.",
            only.task.name
        )),
        many => out.push(format!(
            "Assign resources to {} tasks that currently have none, especially to the critical path tasks.",
            many.len()
        )),
    }

    if !risks.no_dependencies.is_empty() {
        out.push(format!(
            "Review {} tasks that have no predecessors. They might be isolated or disconnected from the project flow.",
            risks.no_dependencies.len()
        ));
    }

    let critical_bottlenecks = risks
        .bottlenecks
        .iter()
        .filter(|b| is_critical(&b.task.id))
        .count();
    if critical_bottlenecks > 0 {
        out.push(format!(
            "Consider breaking down {} long-duration tasks on the critical path into smaller sub-tasks to reduce risk and improve tracking.",
            critical_bottlenecks
        ));
    }
    let other_bottlenecks = risks.bottlenecks.len() - critical_bottlenecks;
    if other_bottlenecks > 0 {
        out.push(format!(
            "Review {} non-critical tasks with unusually long durations. They might benefit from additional resources.",
            other_bottlenecks
        ));
    }

    if !risks.overloaded_resources.is_empty() {
        out.push(format!(
            "Redistribute work from {} potentially overloaded resources to ensure optimal performance and reduce burnout risk.",
            risks.overloaded_resources.len()
        ));
        for resource in risks
            .overloaded_resources
            .iter()
            .filter(|r| r.task_count > severe_overload_threshold)
        {
            out.push(format!(
                "Resource '{}' is assigned to {} tasks which is significantly above recommended limits. Consider immediate reallocation.",
                resource.resource, resource.task_count
            ));
        }
    }

    if let Some(timeline) = risks.timeline_risks.as_ref().filter(|r| !r.is_empty()) {
        out.push(format!(
            "Re-estimate {} complex tasks whose durations look too short for their number of links.",
            timeline.len()
        ));
    }

    if let Some(chains) = risks
        .long_dependency_chains
        .as_ref()
        .filter(|r| !r.is_empty())
    {
        out.push(format!(
            "Look for ways to shorten or parallelize {} long dependency chains; a delay anywhere in them propagates to the end.",
            chains.len()
        ));
    }

    if let Some(conflicts) = risks.resource_conflicts.as_ref().filter(|r| !r.is_empty()) {
        let resources: BTreeSet<&str> =
            conflicts.iter().map(|c| c.resource.as_str()).collect();
        out.push(format!(
            "Stagger the work of {} resources assigned to tasks that can run at the same time, or add capacity.",
            resources.len()
        ));
    }

    if risks.total() > 0 {
        out.push(
            "Consider implementing a regular risk review meeting to address these and other potential issues before they impact the project timeline."
                .to_string(),
        );
    }

    out
}
