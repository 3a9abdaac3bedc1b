// Accuracy Bench Report Types
// Structured output for comparing the precise and fallback methods

use serde::Serialize;

// ─── Error Statistics (per-metric Monte Carlo aggregation) ──────────────────

const Z_95: f64 = 1.96;

/// Running mean/variance (Welford) over one metric's per-run samples.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Half width of the 95% interval around `mean`.
    pub ci95: f64,
    pub min: f64,
    pub max: f64,
}

impl FromIterator<f64> for Stats {
    fn from_iter<I: IntoIterator<Item = f64>>(samples: I) -> Self {
        let (mut n, mut mean, mut m2) = (0usize, 0.0f64, 0.0f64);
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for x in samples {
            n += 1;
            let d = x - mean;
            mean += d / n as f64;
            m2 += d * (x - mean);
            min = min.min(x);
            max = max.max(x);
        }
        if n == 0 {
            return Self { n, mean: 0.0, std_dev: 0.0, ci95: 0.0, min: 0.0, max: 0.0 };
        }
        let std_dev = if n > 1 { (m2 / (n - 1) as f64).sqrt() } else { 0.0 };
        Self { n, mean, std_dev, ci95: Z_95 * std_dev / (n as f64).sqrt(), min, max }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub seed: u64,
    pub method: String,
    pub pass: bool,
    pub attributed_actors: usize,
    pub skipped_actors: usize,
    pub alliance_average_actors: usize,
    pub conservation_breaches: usize,
    /// Mean |attributed total − true total| across attributed actors.
    pub mean_abs_error: f64,
    /// Mean |attributed Auto − true Auto|.
    pub mean_abs_early_error: f64,
    /// Fallback rows whose phases do not sum to the counted total.
    pub unreconciled_rows: usize,
    pub elapsed_us: u128,
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub mean_abs_error: Stats,
    pub mean_abs_early_error: Stats,
    pub skipped_actors: Stats,
    pub alliance_average_actors: Stats,
    pub conservation_breaches: Stats,
    pub elapsed_us: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub base_seed: u64,
    pub summary: Summary,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}
