// Monte Carlo Infrastructure: N synthetic matches per scenario
// Each scenario runs N times with seeds base..base+N, computing mean ± 95% CI

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use attribution_engine::adapter::from_decimal;
use attribution_engine::*;

use crate::report::*;
use crate::scenarios::Scenario;
use crate::synth::MatchGenerator;

use std::time::Instant;

/// Pass threshold on the fraction of passing runs.
pub const PASS_RATE: f64 = 0.9;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(scenario: &Scenario, seed: u64, config: &EngineConfig) -> BenchResult {
    let mut generator = MatchGenerator::new(ChaCha8Rng::seed_from_u64(seed));
    let synthetic = generator.generate(scenario, (seed % 1000) as u32 + 1);

    let start = Instant::now();
    let report = attribute_match(&synthetic.inputs, config);
    let elapsed_us = start.elapsed().as_micros();

    let mut total_err = 0.0;
    let mut early_err = 0.0;
    for r in &report.results {
        let truth = synthetic.truth.get(&r.actor_id).copied().unwrap_or_default();
        total_err += (from_decimal(r.total().0) - truth.total()).abs();
        early_err += (from_decimal(r.early_phase_score.0) - truth.early).abs();
    }
    let n = report.results.len().max(1) as f64;

    let unreconciled_rows = if report.method == Method::Fallback {
        report
            .results
            .iter()
            .filter(|r| {
                synthetic
                    .inputs
                    .totals
                    .iter()
                    .find(|t| t.actor_id == r.actor_id)
                    .map_or(true, |t| t.total_score != r.total())
            })
            .count()
    } else {
        0
    };

    let mean_abs_error = total_err / n;
    let pass = mean_abs_error <= scenario.criteria.max_mean_abs_error
        && (!scenario.criteria.require_reconciled_fallback || unreconciled_rows == 0);

    BenchResult {
        scenario: scenario.name.to_string(),
        seed,
        method: report.method.to_string(),
        pass,
        attributed_actors: report.results.len(),
        skipped_actors: report.skipped_actors.len(),
        alliance_average_actors: report
            .diagnostics
            .iter()
            .filter(|d| d.used_alliance_average)
            .count(),
        conservation_breaches: report.conservation_breaches.len(),
        mean_abs_error,
        mean_abs_early_error: early_err / n,
        unreconciled_rows,
        elapsed_us,
    }
}

pub fn run_monte_carlo(scenario: &Scenario, runs: usize, base_seed: u64, config: &EngineConfig) -> MonteCarloReport {
    let results: Vec<BenchResult> = (0..runs as u64)
        .map(|i| run_single(scenario, base_seed + i, config))
        .collect();

    let col = |f: fn(&BenchResult) -> f64| -> Stats { results.iter().map(f).collect() };

    let passed = results.iter().filter(|r| r.pass).count();

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: runs,
        pass_rate: if runs > 0 { passed as f64 / runs as f64 } else { 0.0 },
        mean_abs_error: col(|r| r.mean_abs_error),
        mean_abs_early_error: col(|r| r.mean_abs_early_error),
        skipped_actors: col(|r| r.skipped_actors as f64),
        alliance_average_actors: col(|r| r.alliance_average_actors as f64),
        conservation_breaches: col(|r| r.conservation_breaches as f64),
        elapsed_us: col(|r| r.elapsed_us as f64),
        individual_runs: results,
    }
}
