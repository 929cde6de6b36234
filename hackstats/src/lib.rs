#![warn(missing_docs)]
//! # Hackstats
//!
//! Statistics for hackers: answer hypothesis-testing questions by simulating
//! the null hypothesis instead of looking up a formula.
//!
//! Hackstats provides:
//! - **Generators**: parametric Bernoulli sums, label permutation, bootstrap
//!   and paired bootstrap resampling
//! - **Reducers**: difference of means, within-subject difference, linear fit
//! - **Engine**: seeded Monte Carlo runs, serial, parallel or lazy, all
//!   producing the same trials for the same seed
//! - **P-values**: empirical tail probabilities with an explicit tail, plus the
//!   exact binomial tail for coin-style nulls
//! - **References**: Welch's t-test and the standard error of the mean
//!
//! ## Quick Start
//!
//! ```ignore
//! use hackstats::prelude::*;
//!
//! let a = [84.0, 72.0, 57.0, 46.0, 63.0, 76.0, 99.0, 91.0];
//! let b = [81.0, 69.0, 74.0, 61.0, 56.0, 87.0, 69.0, 65.0, 66.0, 44.0, 62.0, 69.0];
//! let observed = difference_of_means(&a, &b)?;
//!
//! let engine = MonteCarloEngine::new(&MonteCarloConfig::seeded(10_000, 42))?;
//! let model = Permutation::from_groups(&a, &b)?;
//! let shuffled = engine.run(&model, |(x, y): &(Vec<f64>, Vec<f64>)| difference_of_means(x, y))?;
//! let p = shuffled.tail_probability(observed, Tail::Greater)?;
//! ```
//!
//! ## Scenarios
//!
//! The `hackstats` binary runs the bundled teaching scenarios (exams, coin,
//! groups, measurements, regression, crossval) and reports them as human
//! text, JSON or CSV.

// Re-export the statistical engine
pub use hackstats_stats::*;

// Re-export report types
pub use hackstats_report::{
    DistributionEntry, Metric, OutputFormat, Report, ReportConfig, ScenarioResult,
    ScenarioStatus, generate_csv_report, generate_json_report, parse_json_report,
};

// Re-export the scenario registry
pub use hackstats_cli::{ScenarioContext, ScenarioDef, find_scenario, registry};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Bootstrap, EmpiricalDistribution, GenerativeModel, MonteCarloConfig, MonteCarloEngine,
        PairedBootstrap, Parametric, Permutation, StatsError, StatsResult, Tail,
        TailProbability, difference_of_means, estimate, estimate_analytic, from_fn,
        linear_fit_params, mean, within_subject_difference,
    };
}

/// Run the Hackstats CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     hackstats::run()
/// }
/// ```
pub use hackstats_cli::run;
