//! Statistic Reducers
//!
//! Pure functions boiling a dataset (or a pair of datasets) down to the one
//! number whose extremeness is tested: the apparent effect. Inputs are slices
//! of any [`Observation`] type, so integer draws from the parametric generator
//! and float measurements share the same reducers.

use crate::error::{StatsError, StatsResult, ensure_non_empty, ensure_same_len};
use serde::{Deserialize, Serialize};

/// A numeric sample value: every primitive float and integer type
///
/// 64-bit integers above 2^53 lose precision in the conversion.
pub trait Observation: Copy {
    /// The value as `f64`
    fn to_f64(self) -> f64;
}

macro_rules! impl_observation {
    ($($t:ty),*) => {
        $(
            impl Observation for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_observation!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Arithmetic mean
pub fn mean<T: Observation>(data: &[T]) -> StatsResult<f64> {
    ensure_non_empty(data, "dataset")?;
    Ok(raw_mean(data))
}

/// `mean(a) - mean(b)`
pub fn difference_of_means<T: Observation>(a: &[T], b: &[T]) -> StatsResult<f64> {
    ensure_non_empty(a, "group A")?;
    ensure_non_empty(b, "group B")?;
    Ok(raw_mean(a) - raw_mean(b))
}

/// Mean of the paired differences `after[i] - before[i]`
pub fn within_subject_difference<T: Observation>(before: &[T], after: &[T]) -> StatsResult<f64> {
    ensure_same_len(before, after)?;
    ensure_non_empty(before, "paired dataset")?;
    let total: f64 = before
        .iter()
        .zip(after)
        .map(|(&b, &a)| a.to_f64() - b.to_f64())
        .sum();
    Ok(total / before.len() as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom
///
/// `ddof = 1` gives the unbiased sample estimate, `ddof = 0` the population
/// formula.
pub fn sample_std_dev<T: Observation>(data: &[T], ddof: usize) -> StatsResult<f64> {
    ensure_non_empty(data, "dataset")?;
    if data.len() <= ddof {
        return Err(StatsError::invalid(format!(
            "need more than {} observations for ddof = {}",
            ddof, ddof
        )));
    }
    let m = raw_mean(data);
    let ss: f64 = data.iter().map(|&x| (x.to_f64() - m).powi(2)).sum();
    Ok((ss / (data.len() - ddof) as f64).sqrt())
}

/// Slope and intercept of an ordinary least-squares line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change in y per unit of x
    pub slope: f64,
    /// Value of y at x = 0
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `y = slope * x + intercept` by ordinary least squares
pub fn linear_fit_params<T: Observation>(x: &[T], y: &[T]) -> StatsResult<LinearFit> {
    ensure_same_len(x, y)?;
    ensure_non_empty(x, "x")?;
    if x.len() < 2 {
        return Err(StatsError::invalid("a line needs at least two points"));
    }

    let mx = raw_mean(x);
    let my = raw_mean(y);
    let (sxy, sxx) = x.iter().zip(y).fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
        let dx = xi.to_f64() - mx;
        (sxy + dx * (yi.to_f64() - my), sxx + dx * dx)
    });

    if sxx == 0.0 {
        return Err(StatsError::invalid("x has zero variance, slope is undefined"));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: my - slope * mx,
    })
}

/// Pearson's correlation coefficient
pub fn pearson_correlation<T: Observation>(x: &[T], y: &[T]) -> StatsResult<f64> {
    ensure_same_len(x, y)?;
    ensure_non_empty(x, "x")?;

    let mx = raw_mean(x);
    let my = raw_mean(y);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi.to_f64() - mx;
        let dy = yi.to_f64() - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Err(StatsError::invalid("correlation undefined for constant input"));
    }
    Ok(sxy / (sxx * syy).sqrt())
}

fn raw_mean<T: Observation>(data: &[T]) -> f64 {
    data.iter().map(|&x| x.to_f64()).sum::<f64>() / data.len() as f64
}
