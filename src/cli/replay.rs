//! Replay command implementation.

use super::watch::run_tui;
use super::{CliError, ReplayFormat};
use gridbots::replay::{Recording, ReplayEngine, ReplayError};
use std::path::PathBuf;

/// Default auto-play delay of the replay viewer, in milliseconds.
const REPLAY_SPEED_MS: u64 = 500;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    recording_path: PathBuf,
    format: ReplayFormat,
    turn: Option<u32>,
) -> Result<(), CliError> {
    let recording = Recording::load(&recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;

    let engine = match turn {
        Some(target_turn) => ReplayEngine::new_at_turn(recording, target_turn)?,
        None => ReplayEngine::new(recording)?,
    };

    match format {
        ReplayFormat::Tui => run_tui(engine, REPLAY_SPEED_MS),
        ReplayFormat::Text => print_text_replay(engine),
    }
}

fn print_text_replay(mut engine: ReplayEngine) -> Result<(), CliError> {
    println!("Replay of round (seed: {})", engine.recording().seed);
    println!("Program: {}", engine.recording().program.trim());
    println!();

    loop {
        println!("{}", engine.render_text());

        if engine.is_round_over() {
            println!("=== ROUND OVER ===");
            break;
        }

        match engine.step_forward() {
            Ok(_) => {}
            Err(ReplayError::RoundOver) => {
                println!("=== ROUND OVER ===");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
