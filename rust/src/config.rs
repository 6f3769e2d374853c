//! Configuration for the analysis passes.

use pyo3::prelude::*;

/// Thresholds and switches shared by the analysis passes.
///
/// Every threshold is relative or count based; none of them depend on the
/// calendar.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// A resource used by more than this many tasks is overloaded.
    #[pyo3(get, set)]
    pub overload_threshold: usize,
    /// Overloaded resources above this task count get an extra recommendation.
    #[pyo3(get, set)]
    pub severe_overload_threshold: usize,
    /// A task longer than `mean duration * bottleneck_multiplier` is a bottleneck.
    #[pyo3(get, set)]
    pub bottleneck_multiplier: f64,
    /// Non-critical tasks with at most this much slack are near-critical.
    #[pyo3(get, set)]
    pub near_critical_slack: i64,
    /// Enable the timeline and long dependency chain risk rules.
    #[pyo3(get, set)]
    pub extended_rules: bool,
    /// Unit reported when no task names one.
    #[pyo3(get, set)]
    pub default_duration_unit: String,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            overload_threshold: 3,
            severe_overload_threshold: 5,
            bottleneck_multiplier: 1.5,
            near_critical_slack: 2,
            extended_rules: false,
            default_duration_unit: "days".to_string(),
            verbosity: 0,
        }
    }
}

#[pymethods]
impl AnalysisConfig {
    #[new]
    #[pyo3(signature = (
        overload_threshold=None,
        severe_overload_threshold=None,
        bottleneck_multiplier=None,
        near_critical_slack=None,
        extended_rules=None,
        default_duration_unit=None,
        verbosity=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        overload_threshold: Option<usize>,
        severe_overload_threshold: Option<usize>,
        bottleneck_multiplier: Option<f64>,
        near_critical_slack: Option<i64>,
        extended_rules: Option<bool>,
        default_duration_unit: Option<String>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            overload_threshold: overload_threshold.unwrap_or(defaults.overload_threshold),
            severe_overload_threshold: severe_overload_threshold
                .unwrap_or(defaults.severe_overload_threshold),
            bottleneck_multiplier: bottleneck_multiplier.unwrap_or(defaults.bottleneck_multiplier),
            near_critical_slack: near_critical_slack.unwrap_or(defaults.near_critical_slack),
            extended_rules: extended_rules.unwrap_or(defaults.extended_rules),
            default_duration_unit: default_duration_unit
                .unwrap_or(defaults.default_duration_unit),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "AnalysisConfig(overload_threshold={}, bottleneck_multiplier={}, extended_rules={})",
            self.overload_threshold, self.bottleneck_multiplier, self.extended_rules
        )
    }
}
