#![warn(missing_docs)]
//! Hackstats Statistical Engine
//!
//! Monte Carlo hypothesis testing and resampling:
//! - Random variate generators: parametric Bernoulli sums, label permutation,
//!   bootstrap resampling (single and paired)
//! - Statistic reducers boiling a replicate down to its apparent effect
//! - A seeded, optionally parallel Monte Carlo engine
//! - Empirical and analytic (binomial) tail probabilities behind one trait
//! - Closed-form references (Welch's t-test, standard error of the mean)
//! - Percentile summaries and k-fold cross-validation

mod analytic;
mod crossval;
mod engine;
mod error;
mod generators;
mod percentiles;
mod pvalue;
mod reducers;
mod summary;

pub use analytic::{TTestResult, mean_with_standard_error, welch_t_test};
pub use crossval::{CrossValidation, Fold, KFold, cross_validate_linear_fit};
pub use engine::{EmpiricalDistribution, MonteCarloConfig, MonteCarloEngine, Trials};
pub use error::{StatsError, StatsResult};
pub use generators::{
    Bootstrap, FromFn, GenerativeModel, PairedBootstrap, Parametric, Permutation, SimRng,
    bootstrap_indices, from_fn, generate_bootstrap, generate_paired_bootstrap,
    generate_parametric, generate_permutation,
};
pub use percentiles::{ConfidenceInterval, compute_percentile, percentile_interval};
pub use pvalue::{
    BinomialNull, Tail, TailProbability, TailTally, estimate, estimate_analytic,
    estimate_streaming, estimate_two_sided,
};
pub use reducers::{
    LinearFit, Observation, difference_of_means, linear_fit_params, mean, pearson_correlation,
    sample_std_dev, within_subject_difference,
};
pub use summary::{DistributionSummary, summarize};

/// Default number of Monte Carlo trials
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_ITERATIONS, 10_000);
        assert!((DEFAULT_CONFIDENCE_LEVEL - 0.95).abs() < f64::EPSILON);
        assert_eq!(MonteCarloConfig::default().iterations, DEFAULT_ITERATIONS);
    }
}
