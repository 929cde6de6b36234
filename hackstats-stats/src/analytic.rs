//! Closed-form references
//!
//! The textbook answers a simulation is checked against: Welch's t-test for
//! two groups and the standard error of the mean for a single sample.

use crate::error::{StatsError, StatsResult, ensure_non_empty};
use crate::pvalue::Tail;
use crate::reducers::{Observation, mean, sample_std_dev};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of Welch's unequal-variance t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    /// t statistic of `mean(a) - mean(b)`
    pub t: f64,
    /// Welch-Satterthwaite degrees of freedom
    pub degrees_of_freedom: f64,
    /// One-sided p-value in the requested tail
    pub p_value: f64,
}

/// Welch's t-test of `mean(a) - mean(b)`
///
/// `Tail::Greater` / `Tail::GreaterEqual` test whether `a` is larger;
/// the continuous distribution makes the strict and inclusive forms equal.
pub fn welch_t_test(a: &[f64], b: &[f64], tail: Tail) -> StatsResult<TTestResult> {
    ensure_non_empty(a, "group A")?;
    ensure_non_empty(b, "group B")?;
    if a.len() < 2 || b.len() < 2 {
        return Err(StatsError::invalid(
            "each group needs at least two observations",
        ));
    }

    let na = a.len() as f64;
    let nb = b.len() as f64;
    let va = sample_std_dev(a, 1)?.powi(2) / na;
    let vb = sample_std_dev(b, 1)?.powi(2) / nb;
    let se = (va + vb).sqrt();
    if se == 0.0 {
        return Err(StatsError::invalid("both groups have zero variance"));
    }

    let t = (mean(a)? - mean(b)?) / se;
    let df = (va + vb).powi(2) / (va.powi(2) / (na - 1.0) + vb.powi(2) / (nb - 1.0));

    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatsError::invalid(format!("t distribution: {}", e)))?;
    let p_value = if tail.is_upper() { dist.sf(t) } else { dist.cdf(t) };

    Ok(TTestResult {
        t,
        degrees_of_freedom: df,
        p_value,
    })
}

/// Sample mean and its standard error (`ddof = 1`)
pub fn mean_with_standard_error<T: Observation>(data: &[T]) -> StatsResult<(f64, f64)> {
    let m = mean(data)?;
    let sd = sample_std_dev(data, 1)?;
    Ok((m, sd / (data.len() as f64).sqrt()))
}
