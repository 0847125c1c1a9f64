//! Run command implementation.

use super::output::{JsonRoundResult, JsonTurn, describe_effect, format_text};
use super::{CliError, OutputFormat, read_program, seed_or_now};
use gridbots::lang::parse_with_limit;
use gridbots::replay::{Recording, render_ascii};
use gridbots::{ArenaConfig, Session, SubmitError, Submission};
use std::path::PathBuf;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if a program cannot be read or is not accepted.
#[allow(clippy::too_many_arguments, clippy::needless_pass_by_value)]
pub(crate) fn execute(
    program_path: PathBuf,
    config: ArenaConfig,
    seed: Option<u64>,
    enemy_script: Option<PathBuf>,
    format: OutputFormat,
    save: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let source = read_program(&program_path)?;
    let enemy_source = enemy_script.as_deref().map(read_program).transpose()?;
    let seed = seed_or_now(seed);

    let mut session = Session::new(config, seed)?;
    if let Some(script) = &enemy_source {
        session.script_enemies(script)?;
    }
    session.begin_round();

    let parsed = parse_with_limit(&source, config.max_candidates)?;
    let (candidates, selected) = match session.submit_parsed(&parsed)? {
        Submission::Accepted {
            candidates, selected, ..
        } => (candidates, selected),
        Submission::Quit => return Err(SubmitError::NotAProgram.into()),
    };
    let tree = parsed
        .candidates()
        .get(selected)
        .map(ToString::to_string)
        .unwrap_or_default();

    let text = format == OutputFormat::Text;
    if text && !quiet {
        println!("Running {} with seed {seed}...", program_path.display());
        println!("Reading {} of {candidates}: {tree}", selected + 1);
        println!();
    }

    let mut turns = Vec::new();
    let report = session
        .play_round(|world, outcome| {
            if quiet {
                return;
            }
            if text {
                println!("{}", render_ascii(world, outcome.report.turn + 1, config.turns_per_round));
                for (agent, effect) in &outcome.report.effects {
                    println!("  {}", describe_effect(*agent, effect));
                }
                for (agent, error) in &outcome.report.failures {
                    println!("  {agent} idles: {error}");
                }
                println!();
            } else {
                turns.push(JsonTurn::from_report(&outcome.report));
            }
        })
        .ok_or_else(|| CliError::new("round ended before it started"))?;

    if let Some(save_path) = save {
        let mut recording = Recording::new(seed, source, config);
        if let Some(script) = enemy_source {
            recording = recording.with_enemy_script(script);
        }
        recording
            .save(&save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        if text && !quiet {
            println!("Recording saved to: {}", save_path.display());
            println!();
        }
    }

    let result = JsonRoundResult::new(seed, candidates, selected, tree, &report, turns);
    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
