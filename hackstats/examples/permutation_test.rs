//! Permutation test on two groups of test scores
//!
//! Run with:
//!   cargo run --example permutation_test
//!   cargo run --example permutation_test -- 100000   # more shuffles

use hackstats::prelude::*;
use hackstats::welch_t_test;

fn main() -> StatsResult<()> {
    let iterations = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(10_000);

    let group_a = [84.0, 72.0, 57.0, 46.0, 63.0, 76.0, 99.0, 91.0];
    let group_b = [
        81.0, 69.0, 74.0, 61.0, 56.0, 87.0, 69.0, 65.0, 66.0, 44.0, 62.0, 69.0,
    ];
    let observed = difference_of_means(&group_a, &group_b)?;

    let engine = MonteCarloEngine::new(&MonteCarloConfig::seeded(iterations, 42))?;
    let model = Permutation::from_groups(&group_a, &group_b)?;
    let shuffled = engine.run(&model, |(a, b): &(Vec<f64>, Vec<f64>)| {
        difference_of_means(a, b)
    })?;
    let p = shuffled.tail_probability(observed, Tail::Greater)?;
    let welch = welch_t_test(&group_a, &group_b, Tail::Greater)?;

    println!("observed difference of means: {observed:.3}");
    println!("permutation p-value ({iterations} shuffles): {p:.4}");
    println!(
        "Welch t = {:.4}, df = {:.3}, p = {:.4}",
        welch.t, welch.degrees_of_freedom, welch.p_value
    );
    Ok(())
}
