//! Summary Statistics
//!
//! Characterizes a simulated distribution: its centre, its spread (the
//! standard error of the simulated statistic) and its tails.

use crate::error::{StatsResult, ensure_non_empty};
use crate::percentiles::{percentile_of_sorted, sort_floats};
use serde::{Deserialize, Serialize};

/// Summary of a simulated distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Number of simulated values
    pub count: usize,
    /// Mean of the simulated values
    pub mean: f64,
    /// Population standard deviation (ddof = 0) of the simulated values
    pub std_dev: f64,
    /// Smallest simulated value
    pub min: f64,
    /// Largest simulated value
    pub max: f64,
    /// 5th percentile
    pub p05: f64,
    /// Median
    pub p50: f64,
    /// 95th percentile
    pub p95: f64,
}

/// Summarize a simulated distribution
///
/// The standard deviation uses `ddof = 0`: with thousands of trials the
/// correction is negligible.
pub fn summarize(values: &[f64]) -> StatsResult<DistributionSummary> {
    ensure_non_empty(values, "distribution")?;

    let mut sorted = values.to_vec();
    sort_floats(&mut sorted);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    Ok(DistributionSummary {
        count: n,
        mean,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
        p05: percentile_of_sorted(&sorted, 5.0),
        p50: percentile_of_sorted(&sorted, 50.0),
        p95: percentile_of_sorted(&sorted, 95.0),
    })
}
