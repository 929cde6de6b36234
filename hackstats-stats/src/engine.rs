//! Monte Carlo Engine
//!
//! Runs a fixed number of independent trials. Each trial generates one
//! synthetic dataset from a [`GenerativeModel`] and reduces it to a
//! statistic; the results form an [`EmpiricalDistribution`].
//!
//! Trial `i` draws from its own ChaCha8 stream (the run seed, stream `i`),
//! so a seeded run is reproducible whether it executes serially, on a Rayon
//! pool of any size, or lazily through [`MonteCarloEngine::trials`].

use crate::error::{StatsError, StatsResult};
use crate::generators::{GenerativeModel, SimRng};
use crate::percentiles::{ConfidenceInterval, percentile_interval};
use crate::summary::{DistributionSummary, summarize};
use crate::DEFAULT_ITERATIONS;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Monte Carlo configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of trials (default: 10,000)
    pub iterations: usize,
    /// Seed for reproducible runs; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Whether to spread trials over the Rayon pool
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            parallel: true,
        }
    }
}

impl MonteCarloConfig {
    /// Config with `iterations` trials and a fixed seed
    pub fn seeded(iterations: usize, seed: u64) -> Self {
        Self {
            iterations,
            seed: Some(seed),
            ..Default::default()
        }
    }
}

/// Validated, seeded trial runner
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    iterations: usize,
    seed: u64,
    parallel: bool,
}

impl MonteCarloEngine {
    /// Validate `config` and fix the seed
    pub fn new(config: &MonteCarloConfig) -> StatsResult<Self> {
        if config.iterations == 0 {
            return Err(StatsError::invalid("iterations must be at least 1"));
        }

        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
        tracing::debug!(
            iterations = config.iterations,
            seed,
            parallel = config.parallel,
            "monte carlo engine ready"
        );

        Ok(Self {
            iterations: config.iterations,
            seed,
            parallel: config.parallel,
        })
    }

    /// Configured trial count
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Seed in effect, including one drawn from entropy
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run every trial and collect the statistics in trial order
    ///
    /// Stops at the first reducer error.
    pub fn run<M, F, T>(&self, model: &M, reducer: F) -> StatsResult<EmpiricalDistribution<T>>
    where
        M: GenerativeModel + Sync,
        F: Fn(&M::Output) -> StatsResult<T> + Sync,
        T: Send,
    {
        let values = if self.parallel {
            (0..self.iterations)
                .into_par_iter()
                .map(|i| run_trial(self.seed, i, model, &reducer))
                .collect::<StatsResult<Vec<T>>>()?
        } else {
            self.trials(model, &reducer)
                .collect::<StatsResult<Vec<T>>>()?
        };

        Ok(EmpiricalDistribution {
            values,
            seed: self.seed,
        })
    }

    /// Lazily produce trial results, one per `next()`
    ///
    /// Yields exactly the sequence [`run`](Self::run) would collect, so a
    /// caller can stop early without paying for the remaining trials.
    pub fn trials<'a, M, F, T>(&self, model: &'a M, reducer: F) -> Trials<'a, M, F>
    where
        M: GenerativeModel,
        F: Fn(&M::Output) -> StatsResult<T>,
    {
        Trials {
            model,
            reducer,
            seed: self.seed,
            next: 0,
            end: self.iterations,
        }
    }
}

fn trial_rng(seed: u64, index: usize) -> SimRng {
    let mut rng = SimRng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

fn run_trial<M, F, T>(seed: u64, index: usize, model: &M, reducer: &F) -> StatsResult<T>
where
    M: GenerativeModel,
    F: Fn(&M::Output) -> StatsResult<T>,
{
    let mut rng = trial_rng(seed, index);
    let replicate = model.generate(&mut rng);
    reducer(&replicate)
}

/// Lazy trial iterator returned by [`MonteCarloEngine::trials`]
pub struct Trials<'a, M, F> {
    model: &'a M,
    reducer: F,
    seed: u64,
    next: usize,
    end: usize,
}

impl<M, F, T> Iterator for Trials<'_, M, F>
where
    M: GenerativeModel,
    F: Fn(&M::Output) -> StatsResult<T>,
{
    type Item = StatsResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(run_trial(self.seed, index, self.model, &self.reducer))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl<M, F, T> ExactSizeIterator for Trials<'_, M, F>
where
    M: GenerativeModel,
    F: Fn(&M::Output) -> StatsResult<T>,
{
}

impl<M, F, T> FusedIterator for Trials<'_, M, F>
where
    M: GenerativeModel,
    F: Fn(&M::Output) -> StatsResult<T>,
{
}

/// Statistics of every trial of one engine run, in trial order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalDistribution<T> {
    values: Vec<T>,
    seed: u64,
}

impl<T> EmpiricalDistribution<T> {
    /// Trial results
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Take ownership of the trial results
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Number of trials
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the run produced no trials (never true for an engine run)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Seed of the run that produced this distribution
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Iterate over the trial results
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Project every trial result, e.g. the slope out of a linear fit
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> EmpiricalDistribution<U> {
        EmpiricalDistribution {
            values: self.values.iter().map(f).collect(),
            seed: self.seed,
        }
    }
}

impl EmpiricalDistribution<f64> {
    /// Mean of the simulated statistic
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population standard deviation of the simulated statistic
    pub fn std_dev(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let m = self.mean();
        let variance = self.values.iter().map(|x| (x - m).powi(2)).sum::<f64>()
            / self.values.len() as f64;
        variance.sqrt()
    }

    /// Mean, spread and tails in one pass
    pub fn summarize(&self) -> StatsResult<DistributionSummary> {
        summarize(&self.values)
    }

    /// Equal-tailed percentile interval of the simulated statistic
    pub fn confidence_interval(&self, confidence: f64) -> StatsResult<ConfidenceInterval> {
        percentile_interval(&self.values, confidence)
    }
}

impl<'a, T> IntoIterator for &'a EmpiricalDistribution<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
