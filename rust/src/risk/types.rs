//! Risk report types.

use serde::Serialize;

use crate::models::{Task, TaskId};

/// Overall qualitative risk of a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Fixed bands over the number of flagged items:
    /// 0 → very low, 1–2 → low, 3–5 → medium, 6+ → high.
    pub fn from_count(total_risks: usize) -> Self {
        match total_risks {
            0 => RiskLevel::VeryLow,
            1..=2 => RiskLevel::Low,
            3..=5 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Severity of one flagged item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlaggedTask {
    #[serde(flatten)]
    pub task: Task,
    pub severity: Severity,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bottleneck {
    #[serde(flatten)]
    pub task: Task,
    pub severity: Severity,
    pub average_duration: f64,
    pub duration_ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverloadedResource {
    pub resource: String,
    pub task_count: usize,
    pub tasks: Vec<Task>,
    /// How many of `tasks` are on the critical path.
    pub critical_tasks: usize,
    pub severity: Severity,
}

/// A complex task (many links) with a suspiciously short duration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineRisk {
    #[serde(flatten)]
    pub task: Task,
    pub severity: Severity,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DependencyChainRisk {
    pub task_id: TaskId,
    pub task_name: String,
    /// Longest predecessor chain ending at the task, in execution order.
    pub dependency_chain: Vec<TaskId>,
    pub severity: Severity,
}

/// A shared resource assigned to tasks that do not depend on each other.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceConflict {
    pub resource: String,
    /// The seed task first, then every task not directly linked to it.
    pub conflicting_tasks: Vec<Task>,
    pub critical_tasks: usize,
    pub severity: Severity,
}

/// Flagged items per rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RiskCategories {
    pub no_resources: Vec<FlaggedTask>,
    pub no_dependencies: Vec<FlaggedTask>,
    pub bottlenecks: Vec<Bottleneck>,
    pub overloaded_resources: Vec<OverloadedResource>,
    /// Present only when extended rules are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_risks: Option<Vec<TimelineRisk>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_dependency_chains: Option<Vec<DependencyChainRisk>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_conflicts: Option<Vec<ResourceConflict>>,
}

impl RiskCategories {
    pub fn total(&self) -> usize {
        self.no_resources.len()
            + self.no_dependencies.len()
            + self.bottlenecks.len()
            + self.overloaded_resources.len()
            + self.timeline_risks.as_ref().map_or(0, Vec::len)
            + self.long_dependency_chains.as_ref().map_or(0, Vec::len)
            + self.resource_conflicts.as_ref().map_or(0, Vec::len)
    }

    /// Weighted score per risk family.
    pub fn scores(&self) -> RiskScores {
        let timeline = self.timeline_risks.as_ref().map_or(0, Vec::len);
        let chains = self.long_dependency_chains.as_ref().map_or(0, Vec::len);
        let conflicts = self.resource_conflicts.as_ref().map_or(0, Vec::len);
        RiskScores {
            resource_risks: self.no_resources.len() * 10 + self.overloaded_resources.len() * 15,
            dependency_risks: self.no_dependencies.len() * 5 + chains * 20,
            timeline_risks: self.bottlenecks.len() * 15 + timeline * 10,
            resource_conflicts: conflicts * 20,
        }
    }

    /// Severities of every flagged item, in category order.
    pub fn severities(&self) -> impl Iterator<Item = Severity> + '_ {
        let timeline = self.timeline_risks.iter().flatten().map(|r| r.severity);
        let chains = self
            .long_dependency_chains
            .iter()
            .flatten()
            .map(|r| r.severity);
        let conflicts = self.resource_conflicts.iter().flatten().map(|r| r.severity);
        self.no_resources
            .iter()
            .map(|r| r.severity)
            .chain(self.no_dependencies.iter().map(|r| r.severity))
            .chain(self.bottlenecks.iter().map(|r| r.severity))
            .chain(self.overloaded_resources.iter().map(|r| r.severity))
            .chain(timeline)
            .chain(chains)
            .chain(conflicts)
    }
}

/// Weighted risk per family.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RiskScores {
    pub resource_risks: usize,
    pub dependency_risks: usize,
    pub timeline_risks: usize,
    pub resource_conflicts: usize,
}

/// Aggregate figures over all flagged items.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Unresourced or bottleneck tasks that sit on the critical path.
    pub critical_path_risk_count: usize,
    pub resource_risk_ratio: f64,
    pub dependency_risk_ratio: f64,
    /// high * 3 + medium * 2 + low.
    pub total_risk_score: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskReport {
    pub total_risks: usize,
    pub risk_level: RiskLevel,
    pub risks: RiskCategories,
    pub metrics: RiskMetrics,
    /// Present only when extended rules are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_scores: Option<RiskScores>,
    pub recommendations: Vec<String>,
}
