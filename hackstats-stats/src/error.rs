//! Error taxonomy shared by every component of the engine.

use thiserror::Error;

/// Result alias used throughout the crate
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors raised when an experiment is set up incorrectly
///
/// All of these are detected before any trial runs; a validated model can
/// never fail mid-simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Parameters that can never describe a valid experiment
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A zero-length dataset where at least one observation is needed
    #[error("empty input: {0} must not be empty")]
    EmptyInput(&'static str),

    /// Paired inputs of different lengths
    #[error("dimension mismatch: {left} vs {right} observations")]
    DimensionMismatch {
        /// Length of the first input
        left: usize,
        /// Length of the second input
        right: usize,
    },
}

impl StatsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        StatsError::InvalidConfiguration(msg.into())
    }
}

/// Fail with [`StatsError::EmptyInput`] when `data` has no elements
pub(crate) fn ensure_non_empty<T>(data: &[T], what: &'static str) -> StatsResult<()> {
    if data.is_empty() {
        return Err(StatsError::EmptyInput(what));
    }
    Ok(())
}

/// Fail with [`StatsError::DimensionMismatch`] when the lengths differ
pub(crate) fn ensure_same_len<A, B>(left: &[A], right: &[B]) -> StatsResult<()> {
    if left.len() != right.len() {
        return Err(StatsError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}
