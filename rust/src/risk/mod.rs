//! Structural risk detection.

mod analyzer;
mod recommendations;
mod rules;
mod types;

pub use analyzer::{analyze_risks, RiskAnalyzer};
pub use types::{
    Bottleneck, DependencyChainRisk, FlaggedTask, OverloadedResource, ResourceConflict,
    RiskCategories, RiskLevel, RiskMetrics, RiskReport, RiskScores, Severity, TimelineRisk,
};
