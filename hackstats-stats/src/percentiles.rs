//! Percentile Computation
//!
//! Percentiles and percentile confidence intervals over a simulated
//! distribution.

use crate::error::{StatsError, StatsResult, ensure_non_empty};
use serde::{Deserialize, Serialize};

/// Confidence interval bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Confidence level, e.g. 0.95
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether `value` lies inside the interval (bounds included)
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Compute a single percentile from samples
///
/// Uses linear interpolation between nearest ranks.
///
/// # Examples
///
/// ```ignore
/// # use hackstats_stats::compute_percentile;
/// let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let p50 = compute_percentile(&samples, 50.0);  // Median
/// let p95 = compute_percentile(&samples, 95.0);  // 95th percentile
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sort_floats(&mut sorted);
    percentile_of_sorted(&sorted, percentile)
}

/// Equal-tailed percentile interval, e.g. 2.5% to 97.5% for `confidence = 0.95`
pub fn percentile_interval(samples: &[f64], confidence: f64) -> StatsResult<ConfidenceInterval> {
    ensure_non_empty(samples, "distribution")?;
    if confidence <= 0.0 || confidence >= 1.0 || confidence.is_nan() {
        return Err(StatsError::invalid(format!(
            "confidence level {} must be between 0 and 1",
            confidence
        )));
    }

    let mut sorted = samples.to_vec();
    sort_floats(&mut sorted);

    let alpha = (1.0 - confidence) / 2.0;
    Ok(ConfidenceInterval {
        lower: percentile_of_sorted(&sorted, alpha * 100.0),
        upper: percentile_of_sorted(&sorted, (1.0 - alpha) * 100.0),
        level: confidence,
    })
}

pub(crate) fn sort_floats(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

pub(crate) fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let p = (percentile / 100.0).clamp(0.0, 1.0);
    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        let samples = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let p50 = compute_percentile(&samples, 50.0);
        assert!((p50 - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_quartiles() {
        let samples: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let p25 = compute_percentile(&samples, 25.0);
        let p75 = compute_percentile(&samples, 75.0);

        assert!((p25 - 25.75).abs() < 1.0);
        assert!((p75 - 75.25).abs() < 1.0);
    }

    #[test]
    fn test_single_sample() {
        let samples = vec![42.0];
        assert!((compute_percentile(&samples, 50.0) - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_samples() {
        assert!((compute_percentile(&[], 50.0) - 0.0).abs() < f64::EPSILON);
        assert_eq!(
            percentile_interval(&[], 0.95),
            Err(StatsError::EmptyInput("distribution"))
        );
    }

    #[test]
    fn test_percentile_interval() {
        let samples: Vec<f64> = (0..=1000).map(|x| x as f64).collect();
        let ci = percentile_interval(&samples, 0.95).unwrap();
        assert!((ci.lower - 25.0).abs() < 1e-9);
        assert!((ci.upper - 975.0).abs() < 1e-9);
        assert!(ci.contains(500.0));
        assert!(!ci.contains(1000.0));
    }

    #[test]
    fn test_invalid_confidence() {
        let samples = vec![1.0, 2.0, 3.0];
        assert!(percentile_interval(&samples, 0.0).is_err());
        assert!(percentile_interval(&samples, 1.0).is_err());
        assert!(percentile_interval(&samples, f64::NAN).is_err());
    }
}
