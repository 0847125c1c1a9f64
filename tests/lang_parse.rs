//! Parsing and disambiguation through the public API.
//!
//! Run with: cargo test lang_parse

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use gridbots::arena::{Action, Position, disambiguate, evaluate};
use gridbots::lang::{MAX_NESTING, Parsed, parse, parse_with_limit};
use gridbots::{Agent, ParseError, World};

fn trees(source: &str) -> Vec<String> {
    parse(source)
        .unwrap()
        .candidates()
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// A 10x10 world with one player at (5, 5) running the first candidate.
fn world_with_player(parsed: &Parsed) -> (World, gridbots::AgentId) {
    let mut world = World::new(10, 10).unwrap();
    let program = Arc::new(parsed.candidates()[0].clone());
    let player = world.spawn(|id| Agent::player(id, Position::new(5, 5), program));
    world.spawn(|id| Agent::enemy(id, Position::new(1, 1)));
    (world, player)
}

#[test]
fn test_unambiguous_programs_have_one_reading() {
    for source in [
        "move up",
        "eat",
        "shoot (3, 4)",
        "dup find dead",
        "move (tick % 10, 2)",
        "n = 4; move ($n, $n)",
    ] {
        assert_eq!(trees(source).len(), 1, "{source}");
    }
}

#[test]
fn test_quit_and_exit() {
    assert_eq!(parse("quit").unwrap(), Parsed::Quit);
    assert_eq!(parse("  exit\n").unwrap(), Parsed::Quit);
    assert!(parse("quit").unwrap().candidates().is_empty());
}

#[test]
fn test_parse_errors() {
    assert_eq!(parse(""), Err(ParseError::Empty));
    assert_eq!(
        parse("move @"),
        Err(ParseError::UnexpectedChar { ch: '@', offset: 5 })
    );
    assert_eq!(parse("move"), Err(ParseError::NoDerivation));
    assert_eq!(parse("then else"), Err(ParseError::NoDerivation));
    assert!(matches!(
        parse("move (123456789012345678901234567890, 0)"),
        Err(ParseError::IntegerOutOfRange { offset: 6, .. })
    ));
}

#[test]
fn test_candidate_limit_keeps_first_readings() {
    let source = "move (1 + 1 + 1 + 1 + 1 + 1 + 1, 0)";
    let all = parse(source).unwrap();
    let first = parse_with_limit(source, 4).unwrap();
    assert!(all.candidates().len() > 4);
    assert_eq!(first.candidates(), &all.candidates()[..4]);
}

#[test]
fn test_deeply_nested_program_is_a_parse_error() {
    let source = format!("move {}(1, 1){}", "(".repeat(1600), ")".repeat(1600));
    assert_eq!(
        parse(&source),
        Err(ParseError::TooDeep { limit: MAX_NESTING })
    );
}

#[test]
fn test_single_reading_selected_in_one_trial() {
    let parsed = parse("if tick = 0 then move (0, 0) else move (1, 1)").unwrap();
    assert_eq!(parsed.candidates().len(), 1);

    let (world, player) = world_with_player(&parsed);
    let rng = StdRng::seed_from_u64(3);
    let selection = disambiguate(parsed.candidates(), &world, &rng, player, 25).unwrap();
    assert_eq!(selection.index, 0);
    assert_eq!(selection.trials, 1);
}

#[test]
fn test_direction_difference_selected_over_arithmetic() {
    let parsed = parse("move here - up").unwrap();
    assert!(parsed.candidates().len() > 1);

    let (world, player) = world_with_player(&parsed);
    let rng = StdRng::seed_from_u64(3);
    let selection = disambiguate(parsed.candidates(), &world, &rng, player, 25).unwrap();
    assert_eq!(selection.program.to_string(), "(move (dir- here up))");

    // component-wise: (5, 5) - (5, 4)
    let mut rng = StdRng::seed_from_u64(0);
    let decision = evaluate(&selection.program, 0, player, &world, &mut rng).unwrap();
    assert_eq!(
        decision.action,
        Action::Move {
            to: Position::new(0, 1)
        }
    );
}

#[test]
fn test_conditional_example() {
    let parsed = parse("if tick = 0 then move (0, 0) else move (1, 1)").unwrap();
    let program = &parsed.candidates()[0];
    let (world, player) = world_with_player(&parsed);
    let mut rng = StdRng::seed_from_u64(0);

    let first = evaluate(program, 0, player, &world, &mut rng).unwrap();
    let second = evaluate(program, 1, player, &world, &mut rng).unwrap();
    assert_eq!(first.action, Action::Move { to: Position::new(0, 0) });
    assert_eq!(second.action, Action::Move { to: Position::new(1, 1) });
}

#[test]
fn test_rejected_when_every_reading_fails() {
    let parsed = parse("move ($nowhere, 0)").unwrap();
    let (world, player) = world_with_player(&parsed);
    let rng = StdRng::seed_from_u64(3);
    let rejected = disambiguate(parsed.candidates(), &world, &rng, player, 25).unwrap_err();
    assert_eq!(rejected.failures.len(), parsed.candidates().len());
    assert_eq!(rejected.first_failure().unwrap().turn, 0);
}
