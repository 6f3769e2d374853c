//! Project scheduling, critical path and risk analysis engine.
//!
//! The engine works on an immutable [`TaskGraph`] built from caller-supplied
//! task records. The scheduler, critical path extractor and risk analyzer are
//! independent passes over that graph; [`analyze_project`] runs all of them.
//!
//! The crate is also built as a Python extension module. The Python surface is
//! JSON in, JSON out.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pub mod analysis;
mod config;
pub mod critical_path;
pub mod graph;
pub mod index;
pub mod logging;
mod models;
pub mod payload;
pub mod risk;
pub mod scheduler;
pub mod summary;

pub use analysis::{analyze_project, ProjectAnalysis};
pub use config::AnalysisConfig;
pub use critical_path::{calculate_critical_path, CriticalPathResult, SlackReport, TaskTiming};
pub use graph::{Diagnostic, MalformedInput, Project, TaskGraph};
pub use index::TaskIdx;
pub use models::{
    effective_duration, Schedule, ScheduleEntry, Task, TaskId, TaskStatus, MAX_DURATION,
};
pub use payload::{
    analyze_payload, critical_path_payload, resolve_start, risk_report_payload, schedule_payload,
    PayloadError,
};
pub use risk::{analyze_risks, RiskAnalyzer, RiskLevel, RiskReport};
pub use scheduler::{schedule, ForwardScheduler};
pub use summary::ProjectSummary;

impl From<PayloadError> for PyErr {
    fn from(err: PayloadError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Run every analysis pass over a JSON project record.
///
/// # Arguments
/// * `payload` - JSON object with a task list and optional project metadata
/// * `config` - Analysis thresholds (defaults when omitted)
/// * `start_date` - Used when the record has no start date (defaults to today)
///
/// # Returns
/// * JSON object with summary, schedule, critical_path, slack, risks and diagnostics
///
/// # Raises
/// * ValueError if the payload is malformed
#[pyfunction]
#[pyo3(signature = (payload, config=None, start_date=None))]
fn analyze_project_json(
    payload: &str,
    config: Option<AnalysisConfig>,
    start_date: Option<NaiveDate>,
) -> PyResult<String> {
    let config = config.unwrap_or_default();
    Ok(analyze_payload(payload, &config, start_date, today())?)
}

/// Earliest-start schedule of a JSON project record.
#[pyfunction]
#[pyo3(signature = (payload, config=None, start_date=None))]
fn schedule_json(
    payload: &str,
    config: Option<AnalysisConfig>,
    start_date: Option<NaiveDate>,
) -> PyResult<String> {
    let config = config.unwrap_or_default();
    Ok(schedule_payload(payload, &config, start_date, today())?)
}

/// Critical path of a JSON project record.
#[pyfunction]
#[pyo3(signature = (payload, config=None))]
fn critical_path_json(payload: &str, config: Option<AnalysisConfig>) -> PyResult<String> {
    Ok(critical_path_payload(payload, &config.unwrap_or_default())?)
}

/// Risk report of a JSON project record, rated against its critical path.
#[pyfunction]
#[pyo3(signature = (payload, config=None))]
fn risk_report_json(payload: &str, config: Option<AnalysisConfig>) -> PyResult<String> {
    Ok(risk_report_payload(payload, &config.unwrap_or_default())?)
}

/// The critpath.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Config types
    m.add_class::<AnalysisConfig>()?;

    // Analyses
    m.add_function(wrap_pyfunction!(analyze_project_json, m)?)?;
    m.add_function(wrap_pyfunction!(schedule_json, m)?)?;
    m.add_function(wrap_pyfunction!(critical_path_json, m)?)?;
    m.add_function(wrap_pyfunction!(risk_report_json, m)?)?;

    Ok(())
}
