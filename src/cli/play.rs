//! Play command implementation - the interactive session.

use super::{CliError, read_program, seed_or_now};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use gridbots::lang::{Parsed, parse_with_limit};
use gridbots::replay::render_ascii;
use gridbots::{ArenaConfig, Session, SubmitError, Submission, World};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the enemy script is unusable or the terminal
/// cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    config: ArenaConfig,
    seed: Option<u64>,
    delay: u64,
    enemy_script: Option<PathBuf>,
) -> Result<(), CliError> {
    let seed = seed_or_now(seed);
    let mut session = Session::new(config, seed)?;
    if let Some(path) = enemy_script {
        session.script_enemies(&read_program(&path)?)?;
    }

    let delay = Duration::from_millis(delay);
    let max_turns = config.turns_per_round;
    let mut status = format!("Seed {seed}. Type a program, then an empty line to run it. `quit` exits.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        draw(session.world(), 0, max_turns, session.total_score(), &status)?;
        let Some(source) = read_program_text(&mut lines)? else {
            break;
        };
        if source.trim().is_empty() {
            continue;
        }

        let parsed = match parse_with_limit(&source, config.max_candidates) {
            Ok(Parsed::Quit) => break,
            Ok(parsed) => parsed,
            Err(e) => {
                status = format!("Parse error: {e}");
                continue;
            }
        };

        session.begin_round();
        match session.submit_parsed(&parsed) {
            Ok(Submission::Accepted { candidates, selected, .. }) => {
                status = format!("Running reading {} of {candidates}...", selected + 1);
            }
            Ok(Submission::Quit) => break,
            Err(SubmitError::Rejected(rejected)) => {
                status = match rejected.first_failure() {
                    Some(failure) => {
                        format!("{rejected} (first: turn {}: {})", failure.turn, failure.error)
                    }
                    None => rejected.to_string(),
                };
                continue;
            }
            Err(e) => {
                status = e.to_string();
                continue;
            }
        }

        let total = session.total_score();
        let mut draw_error = None;
        let report = session.play_round(|world, outcome| {
            if draw_error.is_none() {
                draw_error = draw(world, outcome.report.turn + 1, max_turns, total, &status).err();
                thread::sleep(delay);
            }
        });
        if let Some(e) = draw_error {
            return Err(e);
        }

        status = match report {
            Some(report) if report.eaten => format!(
                "Your bot was eaten after {} turns. Round score {}.",
                report.turns_played, report.score
            ),
            Some(report) => format!("Round over. Round score {}.", report.score),
            None => "No round was played.".to_string(),
        };
    }

    println!(
        "Final score: {} over {} rounds",
        session.total_score(),
        session.rounds_played()
    );
    Ok(())
}

/// Clear the screen and show the world with a status line and prompt.
fn draw(world: &World, turn: u32, max_turns: u32, total: i64, status: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    print!("{}", render_ascii(world, turn, max_turns));
    println!("Total score: {total}");
    println!("{status}");
    stdout.flush()?;
    Ok(())
}

/// Collect lines up to the first empty one. `None` at end of input with
/// nothing typed.
fn read_program_text(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<String>, CliError> {
    print!("> ");
    io::stdout().flush()?;

    let mut text = String::new();
    for line in lines.by_ref() {
        let line = line?;
        if line.trim().is_empty() {
            return Ok(Some(text));
        }
        text.push_str(&line);
        text.push('\n');
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(if text.is_empty() { None } else { Some(text) })
}
