//! Tournament command implementation.

use super::output::{
    JsonTournamentResult, TournamentStats, format_tournament_csv, format_tournament_text,
};
use super::{CliError, TournamentFormat, read_program, seed_or_now};
use gridbots::ArenaConfig;
use gridbots::tournament::{TournamentError, compile, run_round};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the program cannot be read or parsed, or the arena
/// configuration is invalid.
#[allow(clippy::needless_pass_by_value, clippy::cast_precision_loss)]
pub(crate) fn execute(
    program_path: PathBuf,
    config: ArenaConfig,
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    config.validate()?;

    // Parse once, not per round
    let source = read_program(&program_path)?;
    let program = compile(&source, &config)?;
    let program_name = program_path
        .file_name()
        .map_or_else(|| "unknown".to_string(), |n| n.to_string_lossy().to_string());

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_now(seed);

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rounds ({per_sec})")
            .map_err(|e| CliError::new(e.to_string()))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread folds into its own stats; merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(TournamentStats::new, |mut local, i| {
            let round_seed = base_seed.wrapping_add(i);
            match run_round(round_seed, &program, config) {
                Ok(result) => local.add_result(&result),
                Err(TournamentError::Submit(e)) => {
                    warn!(seed = round_seed, error = %e, "program rejected");
                    local.add_rejection();
                }
                Err(e @ (TournamentError::Arena(_) | TournamentError::NoRound)) => {
                    warn!(seed = round_seed, error = %e, "round not played");
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(TournamentStats::new, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let rounds_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.attempted() as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &program_name));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} rounds/sec)",
                duration.as_secs_f64(),
                rounds_per_sec
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &program_name);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, &program_name));
        }
    }

    Ok(())
}
