//! P-Value Estimation
//!
//! Turns an observed effect into a tail probability, either empirically
//! (share of simulated statistics at least as extreme) or analytically for
//! nulls with a closed form. Both modes sit behind [`TailProbability`].
//!
//! The comparison used for "as extreme" is always explicit: `>` and `>=`
//! differ on discrete statistics such as head counts.

use crate::engine::EmpiricalDistribution;
use crate::error::{StatsError, StatsResult, ensure_non_empty};
use serde::{Deserialize, Serialize};
use statrs::function::factorial::ln_binomial;

/// Which side of the observed value counts as extreme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tail {
    /// Simulated `>=` observed
    GreaterEqual,
    /// Simulated `>` observed
    #[default]
    Greater,
    /// Simulated `<=` observed
    LessEqual,
    /// Simulated `<` observed
    Less,
}

impl Tail {
    /// Whether `simulated` lies in this tail relative to `observed`
    pub fn is_extreme(self, simulated: f64, observed: f64) -> bool {
        match self {
            Tail::GreaterEqual => simulated >= observed,
            Tail::Greater => simulated > observed,
            Tail::LessEqual => simulated <= observed,
            Tail::Less => simulated < observed,
        }
    }

    /// Whether this tail points up
    pub fn is_upper(self) -> bool {
        matches!(self, Tail::GreaterEqual | Tail::Greater)
    }
}

impl std::fmt::Display for Tail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tail::GreaterEqual => write!(f, ">="),
            Tail::Greater => write!(f, ">"),
            Tail::LessEqual => write!(f, "<="),
            Tail::Less => write!(f, "<"),
        }
    }
}

impl std::str::FromStr for Tail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greater-equal" | "ge" | ">=" => Ok(Tail::GreaterEqual),
            "greater" | "gt" | ">" => Ok(Tail::Greater),
            "less-equal" | "le" | "<=" => Ok(Tail::LessEqual),
            "less" | "lt" | "<" => Ok(Tail::Less),
            other => Err(format!("Unknown tail: {}", other)),
        }
    }
}

/// Capability shared by empirical and analytic nulls: the probability of a
/// statistic at least as extreme as `observed`
pub trait TailProbability {
    /// Probability mass in `tail` relative to `observed`
    fn tail_probability(&self, observed: f64, tail: Tail) -> StatsResult<f64>;
}

impl TailProbability for [f64] {
    fn tail_probability(&self, observed: f64, tail: Tail) -> StatsResult<f64> {
        estimate(observed, self, tail)
    }
}

impl TailProbability for EmpiricalDistribution<f64> {
    fn tail_probability(&self, observed: f64, tail: Tail) -> StatsResult<f64> {
        estimate(observed, self.values(), tail)
    }
}

/// Share of `distribution` lying in `tail` relative to `observed`
pub fn estimate(observed: f64, distribution: &[f64], tail: Tail) -> StatsResult<f64> {
    ensure_non_empty(distribution, "distribution")?;
    let count = distribution
        .iter()
        .filter(|&&x| tail.is_extreme(x, observed))
        .count();
    Ok(count as f64 / distribution.len() as f64)
}

/// Share of `distribution` at least as far from `center` as `observed`
pub fn estimate_two_sided(observed: f64, distribution: &[f64], center: f64) -> StatsResult<f64> {
    ensure_non_empty(distribution, "distribution")?;
    let threshold = (observed - center).abs();
    let count = distribution
        .iter()
        .filter(|&&x| (x - center).abs() >= threshold)
        .count();
    Ok(count as f64 / distribution.len() as f64)
}

/// Exact probability of `n_successes` or more in `n_trials` with success
/// probability `p_null`
pub fn estimate_analytic(n_trials: u64, n_successes: u64, p_null: f64) -> StatsResult<f64> {
    BinomialNull::new(n_trials, p_null)?.tail_probability(n_successes as f64, Tail::GreaterEqual)
}

/// Binomial null: number of successes in `n_trials` independent trials
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialNull {
    n_trials: u64,
    p_null: f64,
}

impl BinomialNull {
    /// Validate and build the null
    pub fn new(n_trials: u64, p_null: f64) -> StatsResult<Self> {
        if !(0.0..=1.0).contains(&p_null) {
            return Err(StatsError::invalid(format!(
                "null success probability {} outside [0, 1]",
                p_null
            )));
        }
        Ok(Self { n_trials, p_null })
    }

    /// Probability of exactly `k` successes
    pub fn pmf(&self, k: u64) -> f64 {
        let n = self.n_trials;
        if k > n {
            return 0.0;
        }
        // ln(0) would turn the degenerate cases into NaN
        if self.p_null == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if self.p_null == 1.0 {
            return if k == n { 1.0 } else { 0.0 };
        }
        let ln_p = ln_binomial(n, k)
            + k as f64 * self.p_null.ln()
            + (n - k) as f64 * (1.0 - self.p_null).ln();
        ln_p.exp()
    }

    /// PMF over every outcome `0..=n_trials`
    pub fn probabilities(&self) -> Vec<f64> {
        (0..=self.n_trials).map(|k| self.pmf(k)).collect()
    }
}

impl TailProbability for BinomialNull {
    fn tail_probability(&self, observed: f64, tail: Tail) -> StatsResult<f64> {
        let total: f64 = (0..=self.n_trials)
            .filter(|&k| tail.is_extreme(k as f64, observed))
            .map(|k| self.pmf(k))
            .sum();
        Ok(total.clamp(0.0, 1.0))
    }
}

/// Outcome of a streamed tail count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailTally {
    /// Trials landing in the tail
    pub tail_count: usize,
    /// Trials consumed
    pub trials_run: usize,
    /// Whether the stream was abandoned before it ran out
    pub stopped_early: bool,
}

impl TailTally {
    /// `tail_count / trials_run`
    pub fn p_value(&self) -> f64 {
        if self.trials_run == 0 {
            return 0.0;
        }
        self.tail_count as f64 / self.trials_run as f64
    }
}

/// Count tail events over a lazy trial stream
///
/// With `stop_after = Some(k)` the stream is abandoned as soon as `k` tail
/// events were seen: enough to know the p-value is not below `k / total`.
pub fn estimate_streaming<I>(
    observed: f64,
    trials: I,
    tail: Tail,
    stop_after: Option<usize>,
) -> StatsResult<TailTally>
where
    I: IntoIterator<Item = StatsResult<f64>>,
{
    if stop_after == Some(0) {
        return Err(StatsError::invalid("stop_after must be at least 1"));
    }

    let mut tally = TailTally {
        tail_count: 0,
        trials_run: 0,
        stopped_early: false,
    };

    let mut trials = trials.into_iter();
    for value in trials.by_ref() {
        let value = value?;
        tally.trials_run += 1;
        if tail.is_extreme(value, observed) {
            tally.tail_count += 1;
        }
        if stop_after.is_some_and(|limit| tally.tail_count >= limit) {
            tally.stopped_early = true;
            break;
        }
    }

    if tally.trials_run == 0 {
        return Err(StatsError::EmptyInput("trial stream"));
    }
    if tally.stopped_early && trials.size_hint().1 == Some(0) {
        tally.stopped_early = false;
    }
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        let dist = [1.0, 2.0, 3.0];
        assert_eq!(estimate(3.0, &dist, Tail::Greater).unwrap(), 0.0);
        assert_eq!(estimate(0.5, &dist, Tail::Greater).unwrap(), 1.0);
        assert_eq!(estimate(4.0, &dist, Tail::Less).unwrap(), 1.0);
    }

    #[test]
    fn test_strict_vs_inclusive() {
        let dist = [1.0, 2.0, 2.0, 3.0];
        assert_eq!(estimate(2.0, &dist, Tail::Greater).unwrap(), 0.25);
        assert_eq!(estimate(2.0, &dist, Tail::GreaterEqual).unwrap(), 0.75);
        assert_eq!(estimate(2.0, &dist, Tail::Less).unwrap(), 0.25);
        assert_eq!(estimate(2.0, &dist, Tail::LessEqual).unwrap(), 0.75);
    }

    #[test]
    fn test_empty_distribution() {
        assert_eq!(
            estimate(1.0, &[], Tail::Greater),
            Err(StatsError::EmptyInput("distribution"))
        );
    }

    #[test]
    fn test_two_sided() {
        let dist = [-3.0, -1.0, 0.0, 1.0, 3.0];
        assert!((estimate_two_sided(2.0, &dist, 0.0).unwrap() - 0.4).abs() < f64::EPSILON);
        assert!((estimate_two_sided(-1.0, &dist, 0.0).unwrap() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coin_analytic() {
        // 22 or more heads in 30 fair tosses: sum of C(30, k) for k >= 22 over 2^30
        let exact = 8_656_937.0 / 1_073_741_824.0;
        let p = estimate_analytic(30, 22, 0.5).unwrap();
        assert!((p - exact).abs() < 1e-12);
        assert!((p - 0.008).abs() < 0.0005);
    }

    #[test]
    fn test_analytic_edges() {
        assert!((estimate_analytic(30, 0, 0.5).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(estimate_analytic(30, 31, 0.5).unwrap(), 0.0);
        assert_eq!(estimate_analytic(10, 1, 0.0).unwrap(), 0.0);
        assert_eq!(estimate_analytic(10, 10, 1.0).unwrap(), 1.0);
        assert!(matches!(
            estimate_analytic(10, 5, 1.5),
            Err(StatsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_binomial_pmf_sums_to_one() {
        let null = BinomialNull::new(50, 0.37).unwrap();
        let total: f64 = null.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-10);
        assert!((null.pmf(0) - 0.63f64.powi(50)).abs() < 1e-15);
    }

    #[test]
    fn test_trait_switches_modes() {
        fn p_value<N: TailProbability + ?Sized>(null: &N, observed: f64) -> f64 {
            null.tail_probability(observed, Tail::GreaterEqual).unwrap()
        }

        let analytic = BinomialNull::new(4, 0.5).unwrap();
        // every outcome of four fair tosses with its multiplicity
        let outcomes = [
            0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0, 4.0,
        ];
        for k in 0..=4 {
            let exact = p_value(&analytic, k as f64);
            let enumerated = p_value(&outcomes[..], k as f64);
            assert!((exact - enumerated).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tail_parse() {
        assert_eq!(">=".parse::<Tail>().unwrap(), Tail::GreaterEqual);
        assert_eq!("greater".parse::<Tail>().unwrap(), Tail::Greater);
        assert_eq!("LE".parse::<Tail>().unwrap(), Tail::LessEqual);
        assert_eq!("less".parse::<Tail>().unwrap(), Tail::Less);
        assert!("sideways".parse::<Tail>().is_err());
        assert_eq!(Tail::default(), Tail::Greater);
        assert_eq!(Tail::GreaterEqual.to_string(), ">=");
    }

    #[test]
    fn test_streaming_rejects_zero_stop() {
        let values = vec![Ok(5.0), Ok(6.0)];
        assert!(matches!(
            estimate_streaming(1.0, values, Tail::Greater, Some(0)),
            Err(StatsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_streaming_full_and_early() {
        let values = vec![0.1, 0.9, 0.8, 0.2, 0.95, 0.3];
        let full = estimate_streaming(0.5, values.iter().map(|&v| Ok(v)), Tail::Greater, None)
            .unwrap();
        assert_eq!(full.tail_count, 3);
        assert_eq!(full.trials_run, 6);
        assert!(!full.stopped_early);
        assert!((full.p_value() - 0.5).abs() < f64::EPSILON);

        let early = estimate_streaming(0.5, values.iter().map(|&v| Ok(v)), Tail::Greater, Some(2))
            .unwrap();
        assert_eq!(early.tail_count, 2);
        assert_eq!(early.trials_run, 3);
        assert!(early.stopped_early);
    }

    #[test]
    fn test_streaming_errors() {
        let empty: Vec<StatsResult<f64>> = Vec::new();
        assert_eq!(
            estimate_streaming(0.0, empty, Tail::Greater, None),
            Err(StatsError::EmptyInput("trial stream"))
        );

        let failing = vec![Ok(1.0), Err(StatsError::EmptyInput("dataset"))];
        assert!(estimate_streaming(0.0, failing, Tail::Greater, None).is_err());
    }
}
