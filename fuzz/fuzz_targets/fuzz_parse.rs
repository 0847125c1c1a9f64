#![no_main]

//! Parser fuzzer.
//!
//! Feeds arbitrary text to the parser. Whatever parses is submitted to a
//! small session and played for a few turns, checking the world's
//! invariants after every turn.

use gridbots::arena::check_invariants;
use gridbots::lang::{Parsed, parse_with_limit};
use gridbots::{ArenaConfig, Session};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|source: &str| {
    let config = ArenaConfig {
        width: 8,
        height: 8,
        turns_per_round: 6,
        max_candidates: 64,
        ..ArenaConfig::default()
    };

    let Ok(parsed) = parse_with_limit(source, config.max_candidates) else {
        return;
    };
    if let Parsed::Candidates(candidates) = &parsed {
        assert!(!candidates.is_empty(), "parser returned no candidates");
        assert!(candidates.len() <= config.max_candidates);
    }

    let Ok(mut session) = Session::new(config, 0) else {
        return;
    };
    session.begin_round();
    if session.submit_parsed(&parsed).is_err() {
        return;
    }
    session.play_round(|world, _| {
        let violations = check_invariants(world);
        assert!(violations.is_empty(), "invariants violated: {violations:?}");
    });
});
