//! Full analysis of one project snapshot.
//!
//! Schedule, critical path, slack and risks are all computed against the same
//! immutable graph. The risk pass gets the critical path ids so that flagged
//! items on the path are rated higher.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::critical_path::{
    compute_slack, critical_path_from_pass, CriticalPathResult, LongestPathPass, SlackReport,
};
use crate::graph::{Diagnostic, Project};
use crate::models::Schedule;
use crate::risk::{RiskAnalyzer, RiskReport};
use crate::scheduler::ForwardScheduler;
use crate::summary::ProjectSummary;
use crate::{log_changes, log_checks};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectAnalysis {
    pub summary: ProjectSummary,
    pub schedule: Schedule,
    pub critical_path: CriticalPathResult,
    pub slack: SlackReport,
    pub risks: RiskReport,
    /// Every fallback applied, builder diagnostics first.
    pub diagnostics: Vec<Diagnostic>,
}

/// Run every pass over `project`.
///
/// The project's own start date wins over `fallback_start`.
pub fn analyze_project(
    project: &Project,
    fallback_start: NaiveDate,
    config: &AnalysisConfig,
) -> ProjectAnalysis {
    let graph = &project.graph;
    let verbosity = config.verbosity;
    let start_date = project.start_date.unwrap_or(fallback_start);

    log_changes!(
        verbosity,
        "analyzing project '{}' ({} tasks) from {}",
        project.name,
        graph.len(),
        start_date
    );

    let schedule = ForwardScheduler::new(graph)
        .with_verbosity(verbosity)
        .schedule(start_date);
    let pass = LongestPathPass::run(graph, verbosity);
    let critical_path = critical_path_from_pass(graph, &pass, config);
    let slack = compute_slack(
        graph,
        &pass,
        &critical_path,
        config.near_critical_slack,
        verbosity,
    );
    let risks = RiskAnalyzer::new(graph, config)
        .with_critical_path(&critical_path.path_ids)
        .analyze();

    let mut diagnostics = graph.diagnostics().to_vec();
    diagnostics.extend(
        schedule
            .forced
            .iter()
            .map(|id| Diagnostic::ForcedSchedule { task: id.clone() }),
    );
    diagnostics.extend(
        critical_path
            .excluded
            .iter()
            .map(|id| Diagnostic::ExcludedFromCriticalPath { task: id.clone() }),
    );
    for diagnostic in &diagnostics {
        log_checks!(verbosity, "{}", diagnostic);
    }

    ProjectAnalysis {
        summary: ProjectSummary::from_project(project, &config.default_duration_unit),
        schedule,
        critical_path,
        slack,
        risks,
        diagnostics,
    }
}
