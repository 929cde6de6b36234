//! Scenario Registry
//!
//! Each scenario pairs a small teaching dataset with the simulation that
//! answers its question: a parametric null, a label shuffle, or a bootstrap.
//! Scenarios never panic; every failure surfaces as a [`StatsError`] and is
//! recorded in the report by the executor.

use hackstats_report::ScenarioResult;
use hackstats_stats::{
    BinomialNull, Bootstrap, DEFAULT_CONFIDENCE_LEVEL, GenerativeModel, KFold, LinearFit,
    MonteCarloConfig, MonteCarloEngine, PairedBootstrap, Parametric, Permutation, SimRng,
    StatsResult, Tail, TailProbability, cross_validate_linear_fit, difference_of_means, from_fn,
    linear_fit_params, mean, mean_with_standard_error, pearson_correlation, welch_t_test,
    within_subject_difference,
};

/// Questions on each exam
pub const NUM_QUESTIONS: u32 = 50;

/// Pre-exam scores of the 30 students
pub const PRE_EXAM_SCORES: [u32; 30] = [
    48, 27, 18, 43, 25, 25, 27, 17, 10, 29, 48, 43, 17, 25, 28, 14, 12, 26, 19, 28, 36, 30, 12,
    48, 19, 41, 1, 3, 30, 50,
];

/// Points every student gained between the two exams
pub const OBSERVED_MEAN_DIFF: u32 = 2;

/// Coin tosses in the fairness experiment
pub const COIN_FLIPS: u64 = 30;

/// Heads observed in [`COIN_FLIPS`] tosses
pub const COIN_HEADS: u64 = 22;

/// Test scores of group A
pub const GROUP_A_SCORES: [f64; 8] = [84.0, 72.0, 57.0, 46.0, 63.0, 76.0, 99.0, 91.0];

/// Test scores of group B
pub const GROUP_B_SCORES: [f64; 12] = [
    81.0, 69.0, 74.0, 61.0, 56.0, 87.0, 69.0, 65.0, 66.0, 44.0, 62.0, 69.0,
];

/// Repeated measurements of one quantity
pub const MEASUREMENTS: [u32; 20] = [
    48, 24, 32, 61, 51, 12, 32, 18, 19, 24, 21, 41, 29, 21, 25, 23, 42, 18, 23, 13,
];

/// Explanatory variable of the regression pairs
pub const REGRESSION_X: [f64; 20] = [
    8.1, 8.3, 8.7, 8.9, 9.0, 9.1, 9.2, 9.3, 9.4, 9.6, 9.9, 10.0, 10.0, 10.5, 10.6, 10.6, 10.6,
    11.2, 11.7, 12.6,
];

/// Response variable of the regression pairs
pub const REGRESSION_Y: [f64; 20] = [
    21.0, 19.0, 17.0, 18.0, 15.0, 17.0, 17.0, 17.0, 19.0, 14.0, 14.0, 15.0, 11.0, 12.0, 12.0,
    12.0, 13.0, 10.0, 8.0, 9.0,
];

/// Folds used by the cross-validation scenario
pub const CROSSVAL_FOLDS: usize = 5;

/// Settings shared by every scenario of one run
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    /// Overrides each scenario's own trial count
    pub iterations: Option<usize>,
    /// Fixed seed; a fresh one is drawn per scenario when unset
    pub seed: Option<u64>,
    /// Spread trials over the Rayon pool
    pub parallel: bool,
    /// Overrides each scenario's own tail
    pub tail: Option<Tail>,
    /// Level of the reported percentile intervals
    pub confidence_level: f64,
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self {
            iterations: None,
            seed: None,
            parallel: true,
            tail: None,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl ScenarioContext {
    /// Engine for a scenario whose natural trial count is `default_iterations`
    pub fn engine(&self, default_iterations: usize) -> StatsResult<MonteCarloEngine> {
        MonteCarloEngine::new(&MonteCarloConfig {
            iterations: self.iterations.unwrap_or(default_iterations),
            seed: self.seed,
            parallel: self.parallel,
        })
    }

    /// Configured tail, or the scenario's own
    pub fn tail_or(&self, default: Tail) -> Tail {
        self.tail.unwrap_or(default)
    }
}

/// A runnable scenario
#[derive(Debug, Clone, Copy)]
pub struct ScenarioDef {
    /// Identifier matched by the CLI filter
    pub id: &'static str,
    /// Question the scenario answers
    pub title: &'static str,
    /// Resampling technique used
    pub method: &'static str,
    /// Build the scenario's result
    pub run: fn(&ScenarioContext) -> StatsResult<ScenarioResult>,
}

static SCENARIOS: [ScenarioDef; 6] = [
    ScenarioDef {
        id: "exams",
        title: "Did the students learn anything between the two exams?",
        method: "parametric",
        run: run_exams,
    },
    ScenarioDef {
        id: "coin",
        title: "Is a coin landing 22 heads in 30 tosses fair?",
        method: "parametric",
        run: run_coin,
    },
    ScenarioDef {
        id: "groups",
        title: "Does group A score higher than group B?",
        method: "permutation",
        run: run_groups,
    },
    ScenarioDef {
        id: "measurements",
        title: "How uncertain is the mean of the measurements?",
        method: "bootstrap",
        run: run_measurements,
    },
    ScenarioDef {
        id: "regression",
        title: "How uncertain are the slope and intercept of the fitted line?",
        method: "paired bootstrap",
        run: run_regression,
    },
    ScenarioDef {
        id: "crossval",
        title: "How well does the fitted line predict held-out points?",
        method: "k-fold",
        run: run_crossval,
    },
];

/// Every scenario, in registration order
pub fn registry() -> &'static [ScenarioDef] {
    &SCENARIOS
}

/// Look a scenario up by id
pub fn find_scenario(id: &str) -> Option<&'static ScenarioDef> {
    SCENARIOS.iter().find(|s| s.id == id)
}

fn run_exams(ctx: &ScenarioContext) -> StatsResult<ScenarioResult> {
    let post_exam_scores: Vec<u32> = PRE_EXAM_SCORES
        .iter()
        .map(|s| s + OBSERVED_MEAN_DIFF)
        .collect();
    let delta = within_subject_difference(&PRE_EXAM_SCORES, &post_exam_scores)?;

    // Null: neither exam tells the students apart from their pre-exam skill.
    let students = Parametric::from_scores(&PRE_EXAM_SCORES, NUM_QUESTIONS)?;
    let model = from_fn(|rng: &mut SimRng| {
        let post = students.generate(rng);
        let pre = students.generate(rng);
        (pre, post)
    });

    let engine = ctx.engine(10_000)?;
    let tail = ctx.tail_or(Tail::Greater);
    let diffs = engine.run(&model, |(pre, post): &(Vec<u32>, Vec<u32>)| {
        within_subject_difference(pre, post)
    })?;
    let p_value = diffs.tail_probability(delta, tail)?;
    tracing::debug!(delta, p_value, %tail, "exams null simulated");

    Ok(ScenarioResult::passed("exams", find_title("exams"))
        .run_info(engine.seed(), engine.iterations())
        .metric("observed_mean_diff", delta)
        .metric("p_value", p_value)
        .distribution(
            "simulated_mean_diff",
            diffs.summarize()?,
            Some(diffs.confidence_interval(ctx.confidence_level)?),
        ))
}

fn run_coin(ctx: &ScenarioContext) -> StatsResult<ScenarioResult> {
    let tail = ctx.tail_or(Tail::GreaterEqual);
    let analytic =
        BinomialNull::new(COIN_FLIPS, 0.5)?.tail_probability(COIN_HEADS as f64, tail)?;

    let coin = Parametric::new(vec![0.5], COIN_FLIPS as u32)?;
    let engine = ctx.engine(100_000)?;
    let heads = engine.run(&coin, |draw: &Vec<u32>| Ok(f64::from(draw[0])))?;
    let simulated = heads.tail_probability(COIN_HEADS as f64, tail)?;
    tracing::debug!(analytic, simulated, %tail, "coin null simulated");

    Ok(ScenarioResult::passed("coin", find_title("coin"))
        .run_info(engine.seed(), engine.iterations())
        .metric("observed_heads", COIN_HEADS as f64)
        .metric("p_value_analytic", analytic)
        .metric("p_value", simulated)
        .distribution("simulated_heads", heads.summarize()?, None))
}

fn run_groups(ctx: &ScenarioContext) -> StatsResult<ScenarioResult> {
    let delta = difference_of_means(&GROUP_A_SCORES, &GROUP_B_SCORES)?;

    let model = Permutation::from_groups(&GROUP_A_SCORES, &GROUP_B_SCORES)?;
    let engine = ctx.engine(10_000)?;
    let tail = ctx.tail_or(Tail::Greater);
    let shuffled = engine.run(&model, |(a, b): &(Vec<f64>, Vec<f64>)| {
        difference_of_means(a, b)
    })?;
    let p_value = shuffled.tail_probability(delta, tail)?;
    let welch = welch_t_test(&GROUP_A_SCORES, &GROUP_B_SCORES, tail)?;
    tracing::debug!(delta, p_value, welch_p = welch.p_value, "groups labels shuffled");

    Ok(ScenarioResult::passed("groups", find_title("groups"))
        .run_info(engine.seed(), engine.iterations())
        .metric("mean_a", mean(&GROUP_A_SCORES)?)
        .metric("mean_b", mean(&GROUP_B_SCORES)?)
        .metric("observed_diff", delta)
        .metric("p_value", p_value)
        .metric("welch_t", welch.t)
        .metric("welch_df", welch.degrees_of_freedom)
        .metric("welch_p_value", welch.p_value)
        .distribution(
            "shuffled_diff",
            shuffled.summarize()?,
            Some(shuffled.confidence_interval(ctx.confidence_level)?),
        ))
}

fn run_measurements(ctx: &ScenarioContext) -> StatsResult<ScenarioResult> {
    let (sample_mean, standard_error) = mean_with_standard_error(&MEASUREMENTS)?;

    let model = Bootstrap::new(MEASUREMENTS.to_vec())?;
    let engine = ctx.engine(1_000)?;
    let means = engine.run(&model, |resample: &Vec<u32>| mean(resample))?;

    Ok(ScenarioResult::passed("measurements", find_title("measurements"))
        .run_info(engine.seed(), engine.iterations())
        .metric("mean", sample_mean)
        .metric("standard_error", standard_error)
        .metric("bootstrap_mean", means.mean())
        .metric("bootstrap_standard_error", means.std_dev())
        .distribution(
            "bootstrap_mean",
            means.summarize()?,
            Some(means.confidence_interval(ctx.confidence_level)?),
        ))
}

fn run_regression(ctx: &ScenarioContext) -> StatsResult<ScenarioResult> {
    let fit = linear_fit_params(&REGRESSION_X, &REGRESSION_Y)?;

    let model = PairedBootstrap::new(REGRESSION_X.to_vec(), REGRESSION_Y.to_vec())?;
    let engine = ctx.engine(10_000)?;
    let fits = engine.run(&model, |(x, y): &(Vec<f64>, Vec<f64>)| linear_fit_params(x, y))?;
    let slopes = fits.map(|f: &LinearFit| f.slope);
    let intercepts = fits.map(|f: &LinearFit| f.intercept);
    let correlation = pearson_correlation(slopes.values(), intercepts.values())?;

    Ok(ScenarioResult::passed("regression", find_title("regression"))
        .run_info(engine.seed(), engine.iterations())
        .metric("slope", fit.slope)
        .metric("intercept", fit.intercept)
        .metric("slope_intercept_correlation", correlation)
        .distribution(
            "slope",
            slopes.summarize()?,
            Some(slopes.confidence_interval(ctx.confidence_level)?),
        )
        .distribution(
            "intercept",
            intercepts.summarize()?,
            Some(intercepts.confidence_interval(ctx.confidence_level)?),
        ))
}

fn run_crossval(ctx: &ScenarioContext) -> StatsResult<ScenarioResult> {
    let kfold = KFold::new(CROSSVAL_FOLDS).seed(ctx.seed.unwrap_or(0));
    let cv = cross_validate_linear_fit(&REGRESSION_X, &REGRESSION_Y, &kfold)?;

    let result = cv.fold_mse.iter().enumerate().fold(
        ScenarioResult::passed("crossval", find_title("crossval")).metric("mean_mse", cv.mean_mse),
        |result, (i, mse)| result.metric(format!("fold_{}_mse", i + 1), *mse),
    );
    Ok(result)
}

fn find_title(id: &str) -> &'static str {
    find_scenario(id).map_or("", |s| s.title)
}
