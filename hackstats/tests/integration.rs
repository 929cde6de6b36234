//! Integration tests for Hackstats
//!
//! These tests verify the end-to-end behavior of the simulation pipeline:
//! generators feeding the engine, reducers, and the p-value estimators.

use hackstats::{
    Bootstrap, GenerativeModel, MonteCarloConfig, MonteCarloEngine, Parametric, Permutation,
    ScenarioContext, ScenarioStatus, SimRng, StatsError, Tail, TailProbability,
    bootstrap_indices, difference_of_means, estimate, estimate_analytic, estimate_streaming,
    find_scenario, from_fn, generate_json_report, generate_permutation, mean, parse_json_report,
    registry, welch_t_test, within_subject_difference,
};
use hackstats_cli::{Executor, PRE_EXAM_SCORES, build_report};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const GROUP_A: [f64; 8] = [84.0, 72.0, 57.0, 46.0, 63.0, 76.0, 99.0, 91.0];
const GROUP_B: [f64; 12] = [
    81.0, 69.0, 74.0, 61.0, 56.0, 87.0, 69.0, 65.0, 66.0, 44.0, 62.0, 69.0,
];

/// Exact share of the C(20, 8) relabelings with a strictly larger difference
const GROUPS_EXACT_P: f64 = 0.15608;

fn engine(iterations: usize, seed: u64) -> MonteCarloEngine {
    MonteCarloEngine::new(&MonteCarloConfig::seeded(iterations, seed)).unwrap()
}

fn coin_heads(iterations: usize, seed: u64) -> Vec<f64> {
    let coin = Parametric::new(vec![0.5], 30).unwrap();
    engine(iterations, seed)
        .run(&coin, |draw: &Vec<u32>| Ok(f64::from(draw[0])))
        .unwrap()
        .into_values()
}

fn exams_p_value(seed: u64) -> f64 {
    let pre = PRE_EXAM_SCORES;
    let post: Vec<u32> = pre.iter().map(|s| s + 2).collect();
    let delta = within_subject_difference(&pre, &post).unwrap();

    let students = Parametric::from_scores(&pre, 50).unwrap();
    let model = from_fn(|rng: &mut SimRng| (students.generate(rng), students.generate(rng)));
    engine(10_000, seed)
        .run(&model, |(a, b): &(Vec<u32>, Vec<u32>)| within_subject_difference(a, b))
        .unwrap()
        .tail_probability(delta, Tail::Greater)
        .unwrap()
}

/// Every run yields exactly one statistic per trial
#[test]
fn test_run_length_matches_iterations() {
    for parallel in [true, false] {
        let config = MonteCarloConfig {
            iterations: 1_234,
            seed: Some(5),
            parallel,
        };
        let model = Bootstrap::new(vec![1.0, 2.0, 3.0]).unwrap();
        let dist = MonteCarloEngine::new(&config)
            .unwrap()
            .run(&model, |r: &Vec<f64>| mean(r))
            .unwrap();
        assert_eq!(dist.len(), 1_234);
    }
}

/// Same seed, same sequence
#[test]
fn test_seeded_runs_are_idempotent() {
    assert_eq!(coin_heads(500, 99), coin_heads(500, 99));
    assert_ne!(coin_heads(500, 99), coin_heads(500, 100));
}

/// Serial, parallel and lazy execution agree trial for trial
#[test]
fn test_execution_modes_agree() {
    let model = Permutation::from_groups(&GROUP_A, &GROUP_B).unwrap();
    let reducer = |(a, b): &(Vec<f64>, Vec<f64>)| difference_of_means(a, b);

    let parallel = engine(300, 11).run(&model, reducer).unwrap();
    let serial = MonteCarloEngine::new(&MonteCarloConfig {
        iterations: 300,
        seed: Some(11),
        parallel: false,
    })
    .unwrap()
    .run(&model, reducer)
    .unwrap();
    let lazy: Vec<f64> = engine(300, 11)
        .trials(&model, reducer)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(parallel.values(), serial.values());
    assert_eq!(parallel.values(), lazy.as_slice());
}

#[test]
fn test_bootstrap_indices_in_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for n in [1, 2, 17, 500] {
        let indices = bootstrap_indices(&mut rng, n).unwrap();
        assert_eq!(indices.len(), n);
        assert!(indices.iter().all(|&i| i < n));
    }
}

#[test]
fn test_permutation_conserves_pool() {
    let pool: Vec<f64> = GROUP_A.iter().chain(&GROUP_B).copied().collect();
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    for _ in 0..50 {
        let (a, b) = generate_permutation(&mut rng, &pool, (8, 12)).unwrap();
        assert_eq!((a.len(), b.len()), (8, 12));

        let mut joined: Vec<f64> = a.into_iter().chain(b).collect();
        let mut expected = pool.clone();
        joined.sort_by(f64::total_cmp);
        expected.sort_by(f64::total_cmp);
        assert_eq!(joined, expected);
    }
}

#[test]
fn test_permutation_rejects_bad_split() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    assert!(matches!(
        generate_permutation(&mut rng, &[1.0, 2.0, 3.0], (2, 2)),
        Err(StatsError::InvalidConfiguration(_))
    ));
}

/// 22 or more heads in 30 fair tosses
#[test]
fn test_analytic_coin_p_value() {
    let p = estimate_analytic(30, 22, 0.5).unwrap();
    let expected = 8_656_937.0 / 1_073_741_824.0;
    assert!((p - expected).abs() < 1e-12, "p = {p}");
}

#[test]
fn test_simulation_converges_to_analytic() {
    let analytic = estimate_analytic(30, 22, 0.5).unwrap();
    let heads = coin_heads(100_000, 2024);
    let simulated = estimate(22.0, &heads, Tail::GreaterEqual).unwrap();
    assert!((simulated - analytic).abs() < 0.01, "{simulated} vs {analytic}");
}

#[test]
fn test_greater_tail_boundaries() {
    let dist = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(estimate(10.0, &dist, Tail::Greater).unwrap(), 0.0);
    assert_eq!(estimate(0.0, &dist, Tail::Greater).unwrap(), 1.0);
    // Ties are excluded by the strict tail and included by the inclusive one.
    assert_eq!(estimate(4.0, &dist, Tail::Greater).unwrap(), 0.0);
    assert_eq!(estimate(4.0, &dist, Tail::GreaterEqual).unwrap(), 0.25);
}

#[test]
fn test_empty_distribution_is_an_error() {
    assert_eq!(
        estimate(1.0, &[], Tail::Greater),
        Err(StatsError::EmptyInput("distribution"))
    );
}

/// Paired exam scenario: valid and stable across seeds
#[test]
fn test_exams_p_value_is_stable() {
    let p_values: Vec<f64> = [1, 2, 3].into_iter().map(exams_p_value).collect();
    for p in &p_values {
        assert!((0.0..=1.0).contains(p));
        assert!(*p < 0.05, "p = {p}");
    }
    let max = p_values.iter().copied().fold(f64::MIN, f64::max);
    let min = p_values.iter().copied().fold(f64::MAX, f64::min);
    assert!(max - min < 0.02);
}

/// Label shuffling recovers the exact permutation p-value and agrees with Welch
#[test]
fn test_permutation_matches_welch() {
    let delta = difference_of_means(&GROUP_A, &GROUP_B).unwrap();
    assert!((delta - 6.583333).abs() < 1e-5);

    let model = Permutation::from_groups(&GROUP_A, &GROUP_B).unwrap();
    let shuffled = engine(10_000, 7)
        .run(&model, |(a, b): &(Vec<f64>, Vec<f64>)| difference_of_means(a, b))
        .unwrap();
    let p = shuffled.tail_probability(delta, Tail::Greater).unwrap();
    assert!((p - GROUPS_EXACT_P).abs() < 0.015, "p = {p}");

    let welch = welch_t_test(&GROUP_A, &GROUP_B, Tail::Greater).unwrap();
    assert!((welch.t - 0.9316).abs() < 1e-3);
    assert!((welch.degrees_of_freedom - 10.696).abs() < 1e-2);
    assert!((p - welch.p_value).abs() < 0.05, "{p} vs {}", welch.p_value);
}

#[test]
fn test_streaming_stops_early() {
    let model = Permutation::from_groups(&GROUP_A, &GROUP_B).unwrap();
    let delta = difference_of_means(&GROUP_A, &GROUP_B).unwrap();
    let trials = engine(10_000, 7).trials(&model, |(a, b): &(Vec<f64>, Vec<f64>)| {
        difference_of_means(a, b)
    });

    let tally = estimate_streaming(delta, trials, Tail::Greater, Some(20)).unwrap();
    assert!(tally.stopped_early);
    assert_eq!(tally.tail_count, 20);
    assert!(tally.trials_run < 10_000);
}

#[test]
fn test_every_scenario_passes() {
    let ctx = ScenarioContext {
        iterations: Some(500),
        seed: Some(1),
        ..Default::default()
    };
    for scenario in registry() {
        let result = (scenario.run)(&ctx).unwrap();
        assert_eq!(result.id, scenario.id);
        assert_eq!(result.status, ScenarioStatus::Passed);
        if let Some(p) = result.metric_value("p_value") {
            assert!((0.0..=1.0).contains(&p));
        }
    }
}

#[test]
fn test_report_json_roundtrip() {
    let ctx = ScenarioContext {
        iterations: Some(200),
        seed: Some(4),
        parallel: false,
        ..Default::default()
    };
    let results = Executor::new(ctx.clone())
        .execute(&[find_scenario("groups").unwrap()]);
    let report = build_report(results, &ctx, 1.0);

    let parsed = parse_json_report(&generate_json_report(&report).unwrap()).unwrap();
    assert_eq!(parsed.summary.passed, 1);
    assert_eq!(parsed.results[0].seed, Some(4));
    assert_eq!(parsed.results[0].iterations, 200);
}
