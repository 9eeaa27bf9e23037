//! Deferred Match - Binary Entry Point
//!
//! Reads candidate and employer preference files, runs one round or a
//! multi-round sequence, and writes the result files.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use deferred_match::config::{LogFormat, LoggingSettings, Settings};
use deferred_match::engine::verify::{verify_round, verify_rounds};
use deferred_match::report::{write_pair_files, write_round_file, DisplacementReport};
use deferred_match::{MatchingEngine, PreferenceStore, RoundResult};

#[derive(Parser)]
#[command(name = "deferred-match", version, about = "Stable matching between candidates and employers")]
struct Cli {
    /// Settings file (TOML); missing file means defaults
    #[arg(long, global = true, default_value = "deferred-match.toml")]
    config: PathBuf,

    /// Candidate preference file, one row per candidate
    #[arg(long, global = true)]
    candidates: Option<PathBuf>,

    /// Employer preference file, one row per employer
    #[arg(long, global = true)]
    employers: Option<PathBuf>,

    /// Log filter, e.g. "debug" (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Fail the run if any round is unstable
    #[arg(long, global = true)]
    verify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single Deferred Acceptance round
    Round(RoundArgs),
    /// Run up to k rounds, removing matched pairs between rounds
    Multi(MultiArgs),
}

#[derive(Args)]
struct RoundArgs {
    /// Employer -> candidate table
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct MultiArgs {
    /// Target number of rounds
    #[arg(long, short = 'k')]
    rounds: Option<usize>,

    #[arg(long)]
    candidate_output: Option<PathBuf>,

    #[arg(long)]
    employer_output: Option<PathBuf>,

    /// Also write per-round displacement averages
    #[arg(long)]
    displacement_output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    apply_overrides(&mut settings, &cli);

    init_tracing(&settings.logging);
    info!("Starting deferred-match...");

    let store = PreferenceStore::from_files(&settings.input.candidates, &settings.input.employers)
        .context("failed to load preferences")?;

    info!(
        candidates = store.candidate_count(),
        employers = store.employer_count(),
        max_listed_employer = store.max_listed_employer().unwrap_or(0),
        "preferences loaded"
    );
    if let Err(e) = store.ensure_non_empty() {
        warn!(error = %e, "continuing with degenerate input");
    }

    let mut engine = MatchingEngine::new();

    match cli.command {
        Commands::Round(_) => run_single(&mut engine, &store, &settings)?,
        Commands::Multi(_) => run_multi(&mut engine, &store, &settings)?,
    }

    let stats = engine.stats();
    info!(rounds = stats.rounds, proposals = stats.proposals, pairs = stats.pairs, "done");
    Ok(())
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(path) = &cli.candidates {
        settings.input.candidates = path.clone();
    }
    if let Some(path) = &cli.employers {
        settings.input.employers = path.clone();
    }
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    if cli.verify {
        settings.matching.verify = true;
    }

    match &cli.command {
        Commands::Round(args) => {
            if let Some(path) = &args.output {
                settings.output.round = path.clone();
            }
        }
        Commands::Multi(args) => {
            if let Some(k) = args.rounds {
                settings.matching.rounds = k;
            }
            if let Some(path) = &args.candidate_output {
                settings.output.candidate_pairs = path.clone();
            }
            if let Some(path) = &args.employer_output {
                settings.output.employer_pairs = path.clone();
            }
            if let Some(path) = &args.displacement_output {
                settings.output.displacement = Some(path.clone());
            }
        }
    }
}

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format {
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

fn log_round(result: &RoundResult) -> anyhow::Result<()> {
    let metrics = result.metrics();
    let digest = result.digest_hex()?;
    info!(
        round = result.round,
        total_proposals = metrics.total_proposals,
        average_proposals = %metrics.average_proposals,
        unmatched_candidates = metrics.unmatched_candidates,
        unmatched_employers = result.matches.unmatched_employers(),
        pairs = metrics.matched_pairs,
        digest = %digest,
        "round metrics"
    );
    Ok(())
}

fn run_single(engine: &mut MatchingEngine, store: &PreferenceStore, settings: &Settings) -> anyhow::Result<()> {
    let result = engine.run_round(store);

    if settings.matching.verify {
        verify_round(store, &result)?;
        info!("round verified stable");
    }
    log_round(&result)?;

    write_round_file(&settings.output.round, &result)?;
    info!(path = %settings.output.round.display(), "matching results written");
    Ok(())
}

fn run_multi(engine: &mut MatchingEngine, store: &PreferenceStore, settings: &Settings) -> anyhow::Result<()> {
    let rounds = engine.run_multi_round(store, settings.matching.rounds)?;

    if settings.matching.verify {
        verify_rounds(store, &rounds)?;
        info!(rounds = rounds.len(), "all rounds verified stable and disjoint");
    }
    for result in &rounds {
        log_round(result)?;
    }

    write_pair_files(
        &settings.output.candidate_pairs,
        &settings.output.employer_pairs,
        &rounds,
        store.candidate_count(),
        store.employer_count(),
    )?;
    info!(
        stable_matchings = rounds.len(),
        candidates = %settings.output.candidate_pairs.display(),
        employers = %settings.output.employer_pairs.display(),
        "pair files written"
    );

    let report = DisplacementReport::compute(store, &rounds);
    for row in &report.rounds {
        info!(
            round = row.round,
            candidate_avg = %row.candidate_avg,
            employer_avg = %row.employer_avg,
            "average displacement"
        );
    }
    if let Some(path) = &settings.output.displacement {
        report.write_csv_file(path)?;
        info!(path = %path.display(), "displacement report written");
    }

    Ok(())
}
