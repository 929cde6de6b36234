//! K-Fold Cross-Validation
//!
//! Estimates how well a fitted line generalizes by holding out each fold in
//! turn, fitting on the rest, and scoring the held-out points.

use crate::error::{StatsError, StatsResult, ensure_same_len};
use crate::generators::SimRng;
use crate::reducers::linear_fit_params;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Indices used for fitting
    pub train: Vec<usize>,
    /// Held-out indices
    pub test: Vec<usize>,
}

/// K-fold splitter
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl KFold {
    /// Splitter with `n_splits` folds, shuffled with seed 0
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: true,
            seed: 0,
        }
    }

    /// Whether to shuffle indices before folding
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seed for the shuffle
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of folds
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Split `0..n_samples` into folds whose sizes differ by at most one
    pub fn split(&self, n_samples: usize) -> StatsResult<Vec<Fold>> {
        if self.n_splits < 2 {
            return Err(StatsError::invalid("k-fold needs at least two folds"));
        }
        if self.n_splits > n_samples {
            return Err(StatsError::invalid(format!(
                "cannot split {} samples into {} folds",
                n_samples, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            indices.shuffle(&mut SimRng::seed_from_u64(self.seed));
        }

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let end = start + fold_size + usize::from(i < remainder);
            let test = indices[start..end].to_vec();
            let train = indices[..start]
                .iter()
                .chain(&indices[end..])
                .copied()
                .collect();
            folds.push(Fold { train, test });
            start = end;
        }

        Ok(folds)
    }
}

/// Held-out error of a cross-validated fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidation {
    /// Mean squared error on each held-out fold
    pub fold_mse: Vec<f64>,
    /// Average of `fold_mse`
    pub mean_mse: f64,
}

/// Cross-validate an ordinary least-squares line through `(x, y)`
pub fn cross_validate_linear_fit(x: &[f64], y: &[f64], kfold: &KFold) -> StatsResult<CrossValidation> {
    ensure_same_len(x, y)?;
    if x.is_empty() {
        return Err(StatsError::EmptyInput("x"));
    }

    let mut fold_mse = Vec::with_capacity(kfold.n_splits());
    for fold in kfold.split(x.len())? {
        let train_x: Vec<f64> = fold.train.iter().map(|&i| x[i]).collect();
        let train_y: Vec<f64> = fold.train.iter().map(|&i| y[i]).collect();
        let fit = linear_fit_params(&train_x, &train_y)?;

        let sse: f64 = fold
            .test
            .iter()
            .map(|&i| (y[i] - fit.predict(x[i])).powi(2))
            .sum();
        fold_mse.push(sse / fold.test.len() as f64);
    }

    let mean_mse = fold_mse.iter().sum::<f64>() / fold_mse.len() as f64;
    Ok(CrossValidation { fold_mse, mean_mse })
}
