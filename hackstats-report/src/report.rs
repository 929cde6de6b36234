//! Report Data Structures

use chrono::{DateTime, Utc};
use hackstats_stats::{ConfidenceInterval, DistributionSummary, Tail};
use serde::{Deserialize, Serialize};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete experiment report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub results: Vec<ScenarioResult>,
    pub summary: ReportSummary,
}

impl Report {
    /// Empty report stamped with the current time
    pub fn new(config: ReportConfig) -> Self {
        Self {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                config,
            },
            results: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    /// Append a scenario and keep the summary counts in step
    pub fn push(&mut self, result: ScenarioResult) {
        self.summary.total_scenarios += 1;
        match result.status {
            ScenarioStatus::Passed => self.summary.passed += 1,
            ScenarioStatus::Failed => self.summary.failed += 1,
        }
        self.results.push(result);
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub config: ReportConfig,
}

/// Run configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Trial count override; `None` when each scenario used its own
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub parallel: bool,
    /// Tail override; `None` when each scenario used its own
    pub tail: Option<Tail>,
}

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub id: String,
    pub title: String,
    pub status: ScenarioStatus,
    /// Seed actually used, so the run can be replayed
    pub seed: Option<u64>,
    pub iterations: usize,
    pub elapsed_ms: f64,
    pub metrics: Vec<Metric>,
    pub distributions: Vec<DistributionEntry>,
    pub failure: Option<FailureInfo>,
}

impl ScenarioResult {
    /// Passed result with no content yet
    pub fn passed(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: ScenarioStatus::Passed,
            seed: None,
            iterations: 0,
            elapsed_ms: 0.0,
            metrics: Vec::new(),
            distributions: Vec::new(),
            failure: None,
        }
    }

    /// Failed result carrying `message`
    pub fn failed(id: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ScenarioStatus::Failed,
            failure: Some(FailureInfo {
                message: message.into(),
            }),
            ..Self::passed(id, title)
        }
    }

    /// Record the seed and trial count of the simulation behind this result
    pub fn run_info(mut self, seed: u64, iterations: usize) -> Self {
        self.seed = Some(seed);
        self.iterations = iterations;
        self
    }

    /// Record a named scalar
    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.push(Metric {
            name: name.into(),
            value,
        });
        self
    }

    /// Record a simulated distribution
    pub fn distribution(
        mut self,
        name: impl Into<String>,
        summary: DistributionSummary,
        interval: Option<ConfidenceInterval>,
    ) -> Self {
        self.distributions.push(DistributionEntry {
            name: name.into(),
            summary,
            interval,
        });
        self
    }

    /// Look up a metric by name
    pub fn metric_value(&self, name: &str) -> Option<f64> {
        self.metrics.iter().find(|m| m.name == name).map(|m| m.value)
    }
}

/// Scenario execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
}

/// A named scalar such as an observed effect or a p-value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
}

/// Summary of one simulated distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub name: String,
    pub summary: DistributionSummary,
    pub interval: Option<ConfidenceInterval>,
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    pub message: String,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_scenarios: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ReportConfig {
        ReportConfig {
            iterations: Some(100),
            seed: Some(1),
            parallel: false,
            tail: Some(Tail::Greater),
        }
    }

    #[test]
    fn test_push_counts() {
        let mut report = Report::new(config());
        report.push(ScenarioResult::passed("coin", "Is the coin fair?").metric("p_value", 0.008));
        report.push(ScenarioResult::failed("groups", "Groups", "empty input"));

        assert_eq!(report.summary.total_scenarios, 2);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.meta.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_metric_lookup() {
        let result = ScenarioResult::passed("exams", "Exams")
            .metric("observed", 2.0)
            .metric("p_value", 0.004);
        assert_eq!(result.metric_value("observed"), Some(2.0));
        assert_eq!(result.metric_value("missing"), None);
    }

    #[test]
    fn test_failed_keeps_identity() {
        let result = ScenarioResult::failed("crossval", "Cross validation", "boom");
        assert_eq!(result.id, "crossval");
        assert_eq!(result.status, ScenarioStatus::Failed);
        assert_eq!(result.failure.unwrap().message, "boom");
    }
}
