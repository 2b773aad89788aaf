use std::path::PathBuf;

use clap::Parser;

use thirtyone_bench::config::SimulationConfig;
use thirtyone_bench::logging::init_logging;
use thirtyone_bench::runner::SimulationRunner;

/// Monte Carlo harness for the greedy 31 hero policy.
#[derive(Debug, Parser)]
#[command(
    name = "thirtyone-bench",
    author,
    version,
    about = "Simulate 31, the card game"
)]
struct Cli {
    /// Optional YAML configuration file; flags override its values.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of players at the table.
    #[arg(long, visible_alias = "player_cnt", value_name = "COUNT")]
    player_count: Option<usize>,

    /// Seat of the hero, the only player who goes down.
    #[arg(long, visible_alias = "hero_id", value_name = "SEAT")]
    hero_id: Option<usize>,

    /// Suited hand value at which the hero goes down.
    #[arg(long, value_name = "VALUE")]
    threshold: Option<u8>,

    /// Number of trials to run.
    #[arg(long, value_name = "COUNT")]
    samples: Option<usize>,

    /// RNG seed; a random seed is chosen and reported when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Directory receiving the numbered CSV files.
    #[arg(long, value_name = "DIR")]
    records_dir: Option<PathBuf>,

    /// Exit after validating the configuration (no trials are run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(player_count) = cli.player_count {
        config.table.player_count = player_count;
    }

    if let Some(hero_id) = cli.hero_id {
        config.table.hero_id = hero_id;
    }

    if let Some(threshold) = cli.threshold {
        config.table.threshold = threshold;
    }

    if let Some(samples) = cli.samples {
        config.samples.count = samples;
    }

    if let Some(seed) = cli.seed {
        config.samples.seed = Some(seed);
    }

    if let Some(records_dir) = cli.records_dir {
        config.outputs.records_dir = records_dir;
    }

    config.validate()?;

    let _logging_guard = init_logging(&config.logging, &config.outputs.records_dir)?;
    let runner = SimulationRunner::new(config, rand::random())?;
    let params = *runner.params();

    println!(
        "{} players, hero at seat {}, threshold {}, {} samples (seed {})",
        params.player_count, params.hero, params.threshold, params.samples, params.seed
    );

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let result = runner.run()?;
    match result.records_path.as_ref() {
        Some(path) => println!("Data exported to {}", path.display()),
        None => println!("No data to export."),
    }
    if let Some(path) = result.summary_path.as_ref() {
        println!("Summary: {}", path.display());
    }

    let summary = &result.summary;
    println!(
        "Hero won {:.1}% (95% CI {:.1}%..{:.1}%), went down in {:.1}% of trials, {:.1} turns per trial",
        summary.hero_win_rate * 100.0,
        summary.hero_win_ci95.0 * 100.0,
        summary.hero_win_ci95.1 * 100.0,
        summary.hero_down_rate * 100.0,
        summary.mean_turns
    );

    Ok(())
}
