//! Output Formatting
//!
//! Human-readable output formatting for experiment reports.
//!
//! Generates terminal-friendly output with:
//! - One block per scenario with a status icon (✓/✗)
//! - Named metrics such as observed effects and p-values
//! - Distribution summaries with percentile intervals

use super::execution::describe_tail;
use hackstats_report::{DistributionEntry, Report, ScenarioStatus};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Hackstats Results\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    let config = &report.meta.config;
    output.push_str(&format!(
        "  seed: {}  iterations: {}  tail: {}  mode: {}\n\n",
        config.seed.map_or_else(|| "random".to_string(), |s| s.to_string()),
        config
            .iterations
            .map_or_else(|| "per scenario".to_string(), |n| n.to_string()),
        describe_tail(config.tail),
        if config.parallel { "parallel" } else { "serial" }
    ));

    for result in &report.results {
        let status_icon = match result.status {
            ScenarioStatus::Passed => "✓",
            ScenarioStatus::Failed => "✗",
        };

        output.push_str(&format!("{} {}\n", status_icon, result.id));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("  {}\n", result.title));

        if let Some(seed) = result.seed {
            output.push_str(&format!(
                "      seed: {}  iterations: {}  time: {:.2} ms\n",
                seed, result.iterations, result.elapsed_ms
            ));
        }

        if !result.metrics.is_empty() {
            let width = result.metrics.iter().map(|m| m.name.len()).max().unwrap_or(0);
            for metric in &result.metrics {
                output.push_str(&format!(
                    "      {:<width$}  {}\n",
                    metric.name,
                    format_value(metric.value),
                    width = width
                ));
            }
        }

        for dist in &result.distributions {
            output.push_str(&format_distribution(dist));
        }

        if let Some(failure) = &result.failure {
            output.push_str(&format!("      error: {}\n", failure.message));
        }

        output.push('\n');
    }

    // Summary
    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}\n",
        report.summary.total_scenarios, report.summary.passed, report.summary.failed
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}

fn format_distribution(dist: &DistributionEntry) -> String {
    let s = &dist.summary;
    let mut out = format!(
        "      {}: mean {}  std {}  (n = {})\n",
        dist.name,
        format_value(s.mean),
        format_value(s.std_dev),
        s.count
    );
    out.push_str(&format!(
        "          p05 {}  p50 {}  p95 {}  min {}  max {}\n",
        format_value(s.p05),
        format_value(s.p50),
        format_value(s.p95),
        format_value(s.min),
        format_value(s.max)
    ));
    if let Some(ci) = &dist.interval {
        out.push_str(&format!(
            "          {:.0}% CI: [{}, {}]\n",
            ci.level * 100.0,
            format_value(ci.lower),
            format_value(ci.upper)
        ));
    }
    out
}

/// Four decimals for everyday values, scientific notation for tiny ones
fn format_value(value: f64) -> String {
    if value != 0.0 && value.abs() < 0.001 {
        format!("{:.3e}", value)
    } else {
        format!("{:.4}", value)
    }
}
