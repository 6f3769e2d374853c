//! JSON-in / JSON-out entry points shared by the Python bindings.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::analysis::analyze_project;
use crate::config::AnalysisConfig;
use crate::critical_path::calculate_critical_path;
use crate::graph::{MalformedInput, Project};
use crate::risk::RiskAnalyzer;
use crate::scheduler::ForwardScheduler;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error(transparent)]
    Malformed(#[from] MalformedInput),
    #[error("Failed to serialize result: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn to_json<T: Serialize>(value: &T) -> Result<String, PayloadError> {
    serde_json::to_string(value).map_err(PayloadError::Serialize)
}

/// Project start date, else the caller's date, else `today`.
pub fn resolve_start(
    project_date: Option<NaiveDate>,
    caller_date: Option<NaiveDate>,
    today: NaiveDate,
) -> NaiveDate {
    project_date.or(caller_date).unwrap_or(today)
}

pub fn analyze_payload(
    payload: &str,
    config: &AnalysisConfig,
    start_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<String, PayloadError> {
    let project = Project::from_json_str(payload)?;
    let start = resolve_start(project.start_date, start_date, today);
    to_json(&analyze_project(&project, start, config))
}

pub fn schedule_payload(
    payload: &str,
    config: &AnalysisConfig,
    start_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<String, PayloadError> {
    let project = Project::from_json_str(payload)?;
    let schedule = ForwardScheduler::new(&project.graph)
        .with_verbosity(config.verbosity)
        .schedule(resolve_start(project.start_date, start_date, today));
    to_json(&schedule)
}

pub fn critical_path_payload(
    payload: &str,
    config: &AnalysisConfig,
) -> Result<String, PayloadError> {
    let project = Project::from_json_str(payload)?;
    to_json(&calculate_critical_path(&project.graph, config))
}

/// Risk report rated against the project's own critical path.
pub fn risk_report_payload(payload: &str, config: &AnalysisConfig) -> Result<String, PayloadError> {
    let project = Project::from_json_str(payload)?;
    let critical = calculate_critical_path(&project.graph, config);
    let report = RiskAnalyzer::new(&project.graph, config)
        .with_critical_path(&critical.path_ids)
        .analyze();
    to_json(&report)
}
