//! Risk analyzer: runs every rule over one graph and assembles the report.

use crate::config::AnalysisConfig;
use crate::graph::TaskGraph;
use crate::models::TaskId;
use crate::{log_changes, log_checks};

use super::recommendations::recommend;
use super::rules;
use super::types::{RiskCategories, RiskLevel, RiskMetrics, RiskReport, Severity};

pub struct RiskAnalyzer<'a> {
    graph: &'a TaskGraph,
    config: &'a AnalysisConfig,
    critical: Vec<bool>,
}

impl<'a> RiskAnalyzer<'a> {
    pub fn new(graph: &'a TaskGraph, config: &'a AnalysisConfig) -> Self {
        Self {
            graph,
            config,
            critical: vec![false; graph.len()],
        }
    }

    /// Mark the tasks of a critical path. Ids not in the graph are ignored.
    pub fn with_critical_path(mut self, path_ids: &[TaskId]) -> Self {
        for id in path_ids {
            if let Some(idx) = self.graph.index_of(id) {
                self.critical[idx as usize] = true;
            }
        }
        self
    }

    fn is_critical(&self, id: &TaskId) -> bool {
        self.graph
            .index_of(id)
            .is_some_and(|idx| self.critical[idx as usize])
    }

    pub fn analyze(&self) -> RiskReport {
        let graph = self.graph;
        let config = self.config;
        let critical = &self.critical;

        let mut risks = RiskCategories {
            no_resources: rules::no_resources(graph, critical),
            no_dependencies: rules::no_dependencies(graph),
            bottlenecks: rules::bottlenecks(graph, critical, config.bottleneck_multiplier),
            overloaded_resources: rules::overloaded_resources(
                graph,
                critical,
                config.overload_threshold,
            ),
            timeline_risks: None,
            long_dependency_chains: None,
            resource_conflicts: None,
        };
        if config.extended_rules {
            risks.timeline_risks = Some(rules::timeline_risks(graph, critical));
            risks.long_dependency_chains = Some(rules::long_dependency_chains(
                graph,
                critical,
                config.verbosity,
            ));
            risks.resource_conflicts = Some(rules::resource_conflicts(graph, critical));
        }

        log_checks!(
            config.verbosity,
            "risk rules: {} unresourced, {} without predecessors, {} bottlenecks, {} overloaded resources",
            risks.no_resources.len(),
            risks.no_dependencies.len(),
            risks.bottlenecks.len(),
            risks.overloaded_resources.len()
        );

        let total_risks = risks.total();
        let risk_level = RiskLevel::from_count(total_risks);
        if total_risks > 0 {
            log_changes!(
                config.verbosity,
                "{} risk(s) flagged, level {}",
                total_risks,
                risk_level.as_str()
            );
        }

        let metrics = self.metrics(&risks);
        let risk_scores = config.extended_rules.then(|| risks.scores());
        let recommendations = recommend(
            &risks,
            |id| self.is_critical(id),
            config.severe_overload_threshold,
        );

        RiskReport {
            total_risks,
            risk_level,
            risks,
            metrics,
            risk_scores,
            recommendations,
        }
    }

    fn metrics(&self, risks: &RiskCategories) -> RiskMetrics {
        let mut metrics = RiskMetrics::default();
        for severity in risks.severities() {
            match severity {
                Severity::High => metrics.high += 1,
                Severity::Medium => metrics.medium += 1,
                Severity::Low => metrics.low += 1,
            }
        }
        metrics.total_risk_score = metrics.high * 3 + metrics.medium * 2 + metrics.low;

        let unresourced = risks.no_resources.iter().map(|r| &r.task.id);
        let bottlenecks = risks.bottlenecks.iter().map(|r| &r.task.id);
        metrics.critical_path_risk_count = unresourced
            .chain(bottlenecks)
            .filter(|id| self.is_critical(id))
            .count();

        if !self.graph.is_empty() {
            let n = self.graph.len() as f64;
            metrics.resource_risk_ratio = risks.no_resources.len() as f64 / n;
            metrics.dependency_risk_ratio = risks.no_dependencies.len() as f64 / n;
        }
        metrics
    }
}

/// Risk report without critical path information.
pub fn analyze_risks(graph: &TaskGraph, config: &AnalysisConfig) -> RiskReport {
    RiskAnalyzer::new(graph, config).analyze()
}
