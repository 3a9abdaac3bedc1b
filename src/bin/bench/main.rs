// Attribution Accuracy Bench: seeded synthetic matches with known ground truth
// Monte Carlo (N=30), ChaCha8 PRNG, precise vs fallback error per scenario
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5         # Quick mode (5 runs each)
//   cargo run --release --bin bench -- FALLBACK         # Filter by name
//   cargo run --release --bin bench -- --json           # Emit the full report as JSON
//   cargo run --release --bin bench -- --seed 42        # Custom base seed
//   cargo run --release --bin bench -- --config cfg.json
//
// Log verbosity comes from ATTRIBUTION_LOG_LEVEL (default: warn).

mod report;
mod scenarios;
mod monte_carlo;
mod synth;

use attribution_engine::EngineConfig;
use monte_carlo::PASS_RATE;
use report::*;
use scenarios::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_RUNS: usize = 30;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Default)]
struct CliArgs {
    runs: Option<usize>,
    seed: u64,
    json: bool,
    config_path: Option<String>,
    filter: Option<String>,
}

/// Flags take the next argument as their value; a missing or unparsable
/// value is reported and the default kept.
fn parse_args(mut args: impl Iterator<Item = String>) -> CliArgs {
    fn value<T: std::str::FromStr>(flag: &str, raw: Option<String>) -> Option<T> {
        let parsed = raw.as_deref().and_then(|v| v.parse().ok());
        if parsed.is_none() {
            eprintln!("Ignoring {flag}: expected a value, got {raw:?}");
        }
        parsed
    }

    let mut cli = CliArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--runs" => cli.runs = value("--runs", args.next()),
            "--seed" => cli.seed = value("--seed", args.next()).unwrap_or(cli.seed),
            "--config" => cli.config_path = args.next(),
            "--json" => cli.json = true,
            name if !name.starts_with('-') => cli.filter = Some(name.to_string()),
            unknown => eprintln!("Unknown argument: {unknown}"),
        }
    }
    cli
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ATTRIBUTION_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&str>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|s| EngineConfig::from_json_str(&s).map_err(|e| e.to_string()));
    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Cannot load config {path}: {e}");
            std::process::exit(2);
        }
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    init_logging();
    let cli = parse_args(std::env::args().skip(1));
    let runs = cli.runs.unwrap_or(DEFAULT_RUNS);
    let config = load_config(cli.config_path.as_deref());
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    if !cli.json {
        println!("\n  Attribution Accuracy Bench");
        println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", runs, cli.seed);
        println!("  Running {} scenario(s)...\n", to_run.len());
        println!("  {:<38} {:>5} {:>13} {:>11} {:>7} {:>7} {:>8}",
            "Scenario", "Pass%", "|Err| total", "|Err| auto", "Skip", "AvgRt", "Time");
        println!("  {}", "-".repeat(96));
    }

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, runs, cli.seed, &config);

        if !cli.json {
            let status = if report.pass_rate >= PASS_RATE { "PASS" } else { "FAIL" };
            println!("  {:<38} {:>4}% {:>7.2}±{:<5.2} {:>11.2} {:>7.2} {:>7.2} {:>6.0}us  {}",
                report.label,
                (report.pass_rate * 100.0) as u32,
                report.mean_abs_error.mean, report.mean_abs_error.ci95,
                report.mean_abs_early_error.mean,
                report.skipped_actors.mean,
                report.alliance_average_actors.mean,
                report.elapsed_us.mean,
                status,
            );
        }

        mc_reports.push(report);
    }

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= PASS_RATE).count();
    let failed = total - passed;

    if cli.json {
        let bench = BenchReport {
            version: env!("CARGO_PKG_VERSION"),
            prng: "ChaCha8Rng",
            n_runs_per_scenario: runs,
            base_seed: cli.seed,
            summary: Summary {
                total,
                passed,
                failed,
                pass_rate: if total > 0 { passed as f64 / total as f64 } else { 0.0 },
            },
            scenarios: mc_reports,
        };
        match serde_json::to_string_pretty(&bench) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Cannot serialise report: {e}");
                std::process::exit(2);
            }
        }
    } else {
        println!("  {}", "-".repeat(96));
        println!("  {passed}/{total} scenarios passed in {:.2?}\n", suite_start.elapsed());
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
