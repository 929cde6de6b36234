//! Random Variate Generators
//!
//! Each generator produces one synthetic dataset per call from an explicit
//! random source:
//! - **Parametric**: per-unit Bernoulli sums (exam scores, coin tosses)
//! - **Permutation**: label shuffle of a pooled sample split into two groups
//! - **Bootstrap**: resampling with replacement, optionally of paired data
//!
//! The free functions validate their inputs on every call. The
//! [`GenerativeModel`] types validate once at construction and are what the
//! Monte Carlo engine drives.

use crate::error::{StatsError, StatsResult, ensure_non_empty, ensure_same_len};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Random source handed to every trial
pub type SimRng = ChaCha8Rng;

/// Draw one success count per probability
///
/// Each entry is the number of successes in `trial_size` independent trials
/// with success probability `p`.
pub fn generate_parametric<R: Rng + ?Sized>(
    rng: &mut R,
    success_probabilities: &[f64],
    trial_size: u32,
) -> StatsResult<Vec<u32>> {
    validate_parametric(success_probabilities, trial_size)?;
    Ok(parametric_draw(rng, success_probabilities, trial_size))
}

/// Shuffle `pool` and split it into groups of `split_sizes.0` and `split_sizes.1`
///
/// The two groups together hold every pool element exactly once.
pub fn generate_permutation<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[T],
    split_sizes: (usize, usize),
) -> StatsResult<(Vec<T>, Vec<T>)> {
    validate_split(pool.len(), split_sizes)?;
    Ok(permutation_draw(rng, pool, split_sizes.0))
}

/// Draw `n` indices uniformly from `0..n` with replacement
pub fn bootstrap_indices<R: Rng + ?Sized>(rng: &mut R, n: usize) -> StatsResult<Vec<usize>> {
    if n == 0 {
        return Err(StatsError::EmptyInput("dataset"));
    }
    Ok((0..n).map(|_| rng.gen_range(0..n)).collect())
}

/// Resample `dataset` with replacement, keeping its length
pub fn generate_bootstrap<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    dataset: &[T],
) -> StatsResult<Vec<T>> {
    ensure_non_empty(dataset, "dataset")?;
    Ok(bootstrap_draw(rng, dataset))
}

/// Resample `(x[i], y[i])` pairs with one shared index draw
pub fn generate_paired_bootstrap<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    x: &[T],
    y: &[T],
) -> StatsResult<(Vec<T>, Vec<T>)> {
    ensure_same_len(x, y)?;
    let indices = bootstrap_indices(rng, x.len())?;
    Ok(gather_pairs(&indices, x, y))
}

fn validate_parametric(success_probabilities: &[f64], trial_size: u32) -> StatsResult<()> {
    ensure_non_empty(success_probabilities, "success probabilities")?;
    if trial_size == 0 {
        return Err(StatsError::invalid("trial size must be at least 1"));
    }
    if let Some(p) = success_probabilities
        .iter()
        .find(|p| !(0.0..=1.0).contains(*p))
    {
        return Err(StatsError::invalid(format!(
            "success probability {} outside [0, 1]",
            p
        )));
    }
    Ok(())
}

fn validate_split(pool_len: usize, (size_a, size_b): (usize, usize)) -> StatsResult<()> {
    if pool_len == 0 {
        return Err(StatsError::EmptyInput("pool"));
    }
    if size_a + size_b != pool_len {
        return Err(StatsError::invalid(format!(
            "split sizes {} + {} do not add up to the pool size {}",
            size_a, size_b, pool_len
        )));
    }
    Ok(())
}

fn parametric_draw<R: Rng + ?Sized>(rng: &mut R, probabilities: &[f64], trial_size: u32) -> Vec<u32> {
    probabilities
        .iter()
        .map(|&p| (0..trial_size).filter(|_| rng.gen_bool(p)).count() as u32)
        .collect()
}

fn permutation_draw<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[T],
    size_a: usize,
) -> (Vec<T>, Vec<T>) {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    let group_b = shuffled.split_off(size_a);
    (shuffled, group_b)
}

fn bootstrap_draw<T: Clone, R: Rng + ?Sized>(rng: &mut R, dataset: &[T]) -> Vec<T> {
    let n = dataset.len();
    (0..n).map(|_| dataset[rng.gen_range(0..n)].clone()).collect()
}

fn gather_pairs<T: Clone>(indices: &[usize], x: &[T], y: &[T]) -> (Vec<T>, Vec<T>) {
    indices
        .iter()
        .map(|&i| (x[i].clone(), y[i].clone()))
        .unzip()
}

/// A procedure producing one synthetic dataset consistent with a null or
/// resampling hypothesis
pub trait GenerativeModel {
    /// One synthetic replicate of the experiment
    type Output;

    /// Generate a replicate from `rng`
    fn generate(&self, rng: &mut SimRng) -> Self::Output;
}

/// Per-unit success probabilities with a fixed number of trials per unit
#[derive(Debug, Clone)]
pub struct Parametric {
    probabilities: Vec<f64>,
    trial_size: u32,
}

impl Parametric {
    /// Validate and build the model
    pub fn new(success_probabilities: Vec<f64>, trial_size: u32) -> StatsResult<Self> {
        validate_parametric(&success_probabilities, trial_size)?;
        Ok(Self {
            probabilities: success_probabilities,
            trial_size,
        })
    }

    /// Probabilities from observed scores: `score / trial_size` per unit
    pub fn from_scores(scores: &[u32], trial_size: u32) -> StatsResult<Self> {
        if trial_size == 0 {
            return Err(StatsError::invalid("trial size must be at least 1"));
        }
        let probabilities = scores
            .iter()
            .map(|&s| s as f64 / trial_size as f64)
            .collect();
        Self::new(probabilities, trial_size)
    }

    /// Success probability per unit
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Trials per unit
    pub fn trial_size(&self) -> u32 {
        self.trial_size
    }
}

impl GenerativeModel for Parametric {
    type Output = Vec<u32>;

    fn generate(&self, rng: &mut SimRng) -> Vec<u32> {
        parametric_draw(rng, &self.probabilities, self.trial_size)
    }
}

/// Label shuffle of a pooled sample
#[derive(Debug, Clone)]
pub struct Permutation<T> {
    pool: Vec<T>,
    size_a: usize,
}

impl<T: Clone> Permutation<T> {
    /// Pool `group_a` and `group_b`, keeping their sizes for the split
    pub fn from_groups(group_a: &[T], group_b: &[T]) -> StatsResult<Self> {
        ensure_non_empty(group_a, "group A")?;
        ensure_non_empty(group_b, "group B")?;
        let pool = group_a.iter().chain(group_b).cloned().collect();
        Self::new(pool, (group_a.len(), group_b.len()))
    }

    /// Validate and build the model
    pub fn new(pool: Vec<T>, split_sizes: (usize, usize)) -> StatsResult<Self> {
        validate_split(pool.len(), split_sizes)?;
        Ok(Self {
            pool,
            size_a: split_sizes.0,
        })
    }

    /// Sizes of the two generated groups
    pub fn split_sizes(&self) -> (usize, usize) {
        (self.size_a, self.pool.len() - self.size_a)
    }
}

impl<T: Clone> GenerativeModel for Permutation<T> {
    type Output = (Vec<T>, Vec<T>);

    fn generate(&self, rng: &mut SimRng) -> Self::Output {
        permutation_draw(rng, &self.pool, self.size_a)
    }
}

/// Resampling with replacement of a single dataset
#[derive(Debug, Clone)]
pub struct Bootstrap<T> {
    data: Vec<T>,
}

impl<T: Clone> Bootstrap<T> {
    /// Validate and build the model
    pub fn new(data: Vec<T>) -> StatsResult<Self> {
        ensure_non_empty(&data, "dataset")?;
        Ok(Self { data })
    }
}

impl<T: Clone> GenerativeModel for Bootstrap<T> {
    type Output = Vec<T>;

    fn generate(&self, rng: &mut SimRng) -> Vec<T> {
        bootstrap_draw(rng, &self.data)
    }
}

/// Resampling with replacement of paired observations
#[derive(Debug, Clone)]
pub struct PairedBootstrap<T> {
    x: Vec<T>,
    y: Vec<T>,
}

impl<T: Clone> PairedBootstrap<T> {
    /// Validate and build the model
    pub fn new(x: Vec<T>, y: Vec<T>) -> StatsResult<Self> {
        ensure_same_len(&x, &y)?;
        ensure_non_empty(&x, "paired dataset")?;
        Ok(Self { x, y })
    }
}

impl<T: Clone> GenerativeModel for PairedBootstrap<T> {
    type Output = (Vec<T>, Vec<T>);

    fn generate(&self, rng: &mut SimRng) -> Self::Output {
        let n = self.x.len();
        let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
        gather_pairs(&indices, &self.x, &self.y)
    }
}

/// Model backed by a closure, see [`from_fn`]
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(F);

/// Wrap a closure as a [`GenerativeModel`]
///
/// Useful for composite experiments, e.g. drawing a pre-test and a post-test
/// from the same [`Parametric`] model in one trial.
pub fn from_fn<F, D>(f: F) -> FromFn<F>
where
    F: Fn(&mut SimRng) -> D,
{
    FromFn(f)
}

impl<F, D> GenerativeModel for FromFn<F>
where
    F: Fn(&mut SimRng) -> D,
{
    type Output = D;

    fn generate(&self, rng: &mut SimRng) -> D {
        (self.0)(rng)
    }
}
