//! Scenario Execution
//!
//! Runs each planned scenario in turn. A scenario that returns an error is
//! recorded as failed and the remaining scenarios still run.

use crate::scenarios::{ScenarioContext, ScenarioDef};
use hackstats_report::{Report, ReportConfig, ScenarioResult, ScenarioStatus};
use hackstats_stats::Tail;
use std::time::Instant;

/// Runs scenarios against one shared context
#[derive(Debug, Clone)]
pub struct Executor {
    context: ScenarioContext,
}

impl Executor {
    /// Create an executor for `context`
    pub fn new(context: ScenarioContext) -> Self {
        Self { context }
    }

    /// Context handed to every scenario
    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    /// Run every scenario, in order
    pub fn execute(&self, scenarios: &[&'static ScenarioDef]) -> Vec<ScenarioResult> {
        scenarios.iter().map(|s| self.execute_one(s)).collect()
    }

    fn execute_one(&self, scenario: &ScenarioDef) -> ScenarioResult {
        tracing::info!(scenario = scenario.id, method = scenario.method, "running scenario");
        let start = Instant::now();

        let mut result = match (scenario.run)(&self.context) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(scenario = scenario.id, error = %e, "scenario failed");
                ScenarioResult::failed(scenario.id, scenario.title, e.to_string())
            }
        };
        result.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        if result.status == ScenarioStatus::Passed {
            tracing::info!(
                scenario = scenario.id,
                seed = result.seed,
                iterations = result.iterations,
                elapsed_ms = result.elapsed_ms,
                "scenario finished"
            );
        }
        result
    }
}

/// Assemble the report for one run
pub fn build_report(
    results: Vec<ScenarioResult>,
    context: &ScenarioContext,
    total_duration_ms: f64,
) -> Report {
    let mut report = Report::new(ReportConfig {
        iterations: context.iterations,
        seed: context.seed,
        parallel: context.parallel,
        tail: context.tail,
    });
    for result in results {
        report.push(result);
    }
    report.summary.total_duration_ms = total_duration_ms;
    report
}

/// Tail recorded for a run without an override
pub(crate) fn describe_tail(tail: Option<Tail>) -> String {
    tail.map_or_else(|| "per scenario".to_string(), |t| t.to_string())
}
