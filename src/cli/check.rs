//! Check command implementation - show how a program reads.

use super::{CliError, read_program};
use gridbots::lang::{Parsed, parse_tokens, tokenize};
use gridbots::{ArenaConfig, Session, SubmitError, Submission};
use std::path::PathBuf;

/// Execute the check command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the program does not
/// parse. A program that parses but no reading of which evaluates is
/// reported, not an error.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(program_path: PathBuf, config: ArenaConfig, seed: u64) -> Result<(), CliError> {
    let source = read_program(&program_path)?;
    println!("Checking {}...", program_path.display());

    let tokens = tokenize(&source)?;
    let words: Vec<String> = tokens.iter().map(|t| t.kind.to_string()).collect();
    println!("  Tokens ({}): {}", tokens.len(), words.join(" "));

    let parsed = parse_tokens(&tokens, config.max_candidates)?;
    let candidates = match &parsed {
        Parsed::Quit => {
            println!("  Quit command");
            return Ok(());
        }
        Parsed::Candidates(candidates) => candidates,
    };

    if candidates.len() == config.max_candidates {
        println!("  Readings (first {}):", candidates.len());
    } else {
        println!("  Readings ({}):", candidates.len());
    }
    for (i, program) in candidates.iter().enumerate() {
        println!("    [{i}] {program}");
    }
    println!();

    let mut session = Session::new(config, seed)?;
    session.begin_round();
    match session.submit_parsed(&parsed) {
        Ok(Submission::Accepted { selected, .. }) => {
            println!("✓ Selected reading [{selected}] (seed {seed})");
        }
        Ok(Submission::Quit) => println!("  Quit command"),
        Err(SubmitError::Rejected(rejected)) => {
            println!("✗ {rejected} (seed {seed})");
            for failure in &rejected.failures {
                println!(
                    "    [{}] turn {}: {}",
                    failure.candidate, failure.turn, failure.error
                );
            }
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
