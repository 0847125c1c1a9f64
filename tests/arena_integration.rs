//! Multi-turn integration tests for the arena and sessions.
//!
//! These tests play whole rounds and check that the world stays consistent
//! and that every round is reproducible from its seed.
//!
//! Run with: cargo test --release arena_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use gridbots::arena::{Action, Brain, Decision, Effect, Position, apply, check_invariants};
use gridbots::lang::Expr;
use gridbots::replay::{Recording, ReplayEngine};
use gridbots::tournament::{compile, run_batch, run_round};
use gridbots::{Agent, AgentKind, ArenaConfig, Session, SubmitError, Submission, World};

fn config() -> ArenaConfig {
    ArenaConfig {
        width: 16,
        height: 10,
        turns_per_round: 30,
        ..ArenaConfig::default()
    }
}

fn accepted(session: &mut Session, source: &str) -> Submission {
    let submission = session.submit(source).unwrap();
    assert!(matches!(submission, Submission::Accepted { .. }));
    submission
}

#[test]
fn test_rounds_keep_invariants() {
    let programs = [
        "shoot find enemy",
        "move random",
        "if tick % 3 = 0 then dup right else move find dead -> eat",
        "n = tick; move ($n % 16, 2)",
        "eat",
    ];

    for (seed, source) in programs.iter().enumerate() {
        let mut session = Session::new(config(), seed as u64).unwrap();
        session.begin_round();
        accepted(&mut session, source);

        let report = session
            .play_round(|world, _| {
                let violations = check_invariants(world);
                assert!(violations.is_empty(), "{source}: {violations:?}");
            })
            .unwrap();
        assert!(report.turns_played <= 30);
        assert!(session.world().agents().iter().all(|a| !a.active));
    }
}

#[test]
fn test_scores_accumulate_over_rounds() {
    let mut session = Session::new(config(), 7).unwrap();
    let mut expected = 0;
    for _ in 0..3 {
        session.begin_round();
        accepted(&mut session, "shoot find enemy");
        let report = session.play_round(|_, _| {}).unwrap();
        expected += report.score;
        assert_eq!(report.total_score, expected);
    }
    assert_eq!(session.total_score(), expected);
    assert_eq!(session.rounds_played(), 3);

    // Retired players stay in the world unless eaten
    let players = session
        .world()
        .agents()
        .iter()
        .filter(|a| a.kind == AgentKind::Player)
        .count();
    assert_eq!(players, 3);
}

#[test]
fn test_rejected_program_is_not_placed() {
    let mut session = Session::new(config(), 1).unwrap();
    session.begin_round();
    let before = session.world().len();
    let err = session
        .submit("if tick = 100 then move $never else move up")
        .unwrap_err();
    assert!(matches!(err, SubmitError::Rejected(_)));
    assert_eq!(session.world().len(), before);
    assert!(session.current_player().is_none());
}

#[test]
fn test_long_round_robin_is_accepted() {
    let branches = [
        "move up",
        "move down",
        "move left",
        "move right",
        "eat",
        "shoot up",
        "eat",
        "eat",
        "dup left",
        "shoot right",
    ];
    let mut session = Session::new(config(), 12).unwrap();
    session.begin_round();
    let Submission::Accepted { player, selected, .. } =
        session.submit(&branches.join(" -> ")).unwrap()
    else {
        panic!("expected a player");
    };
    assert_eq!(selected, 0);

    let Brain::Script(program) = &session.world().get(player).unwrap().brain else {
        panic!("player runs no program");
    };
    let Expr::Sequence(installed) = &program.body else {
        panic!("expected a sequence, got {program}");
    };
    assert_eq!(installed.len(), branches.len());
    session.play_round(|_, _| {}).unwrap();
}

#[test]
fn test_scripted_enemies_stand_still() {
    let mut session = Session::new(config(), 4).unwrap();
    session.script_enemies("move here").unwrap();
    let enemies: Vec<Position> = session.world().agents().iter().map(|a| a.position).collect();

    session.begin_round();
    accepted(&mut session, "move here");
    session.play_round(|_, _| {}).unwrap();

    let after: Vec<Position> = session
        .world()
        .agents()
        .iter()
        .filter(|a| a.kind == AgentKind::Enemy)
        .map(|a| a.position)
        .collect();
    assert_eq!(&after[..enemies.len()], &enemies[..]);
}

#[test]
fn test_tournament_round_is_reproducible() {
    let program = compile("move up -> shoot find enemy", &config()).unwrap();
    let first = run_round(99, &program, config()).unwrap();
    let second = run_round(99, &program, config()).unwrap();
    assert_eq!(first, second);

    let batch = run_batch(99, 4, &program, config()).unwrap();
    assert_eq!(batch[0], first);
    assert_eq!(batch.iter().map(|r| r.seed).collect::<Vec<_>>(), vec![99, 100, 101, 102]);
}

#[test]
fn test_replay_matches_session() {
    let source = "if tick % 2 = 0 then shoot find enemy else move random";
    let mut session = Session::new(config(), 21).unwrap();
    session.begin_round();
    accepted(&mut session, source);
    let report = session.play_round(|_, _| {}).unwrap();

    let mut engine = ReplayEngine::new(Recording::new(21, source, config())).unwrap();
    while !engine.is_round_over() {
        engine.step_forward().unwrap();
    }
    assert_eq!(engine.turn(), report.turns_played);
    let replayed: Vec<(Position, bool, i64)> = engine
        .world()
        .agents()
        .iter()
        .map(|a| (a.position, a.dead, a.score))
        .collect();
    let original: Vec<(Position, bool, i64)> = session
        .world()
        .agents()
        .iter()
        .map(|a| (a.position, a.dead, a.score))
        .collect();
    assert_eq!(replayed, original);
}

#[test]
fn test_shoot_example() {
    let mut world = World::new(3, 3).unwrap();
    let shooter = world.spawn(|id| Agent::enemy(id, Position::new(1, 1)));
    let target = world.spawn(|id| Agent::enemy(id, Position::new(2, 1)));

    let effect = apply(
        &mut world,
        shooter,
        Decision::bare(Action::Shoot {
            at: Position::new(2, 1),
        }),
    );
    assert_eq!(effect, Effect::Hit { target });
    assert_eq!(world.get(shooter).unwrap().score, 1);
    let target = world.get(target).unwrap();
    assert!(target.dead);
    assert!(target.just_shot);
}

#[test]
fn test_eat_then_duplicate() {
    let mut world = World::new(5, 5).unwrap();
    let eater = world.spawn(|id| Agent::enemy(id, Position::new(2, 2)));
    for _ in 0..2 {
        let corpse = world.spawn(|id| Agent::enemy(id, Position::new(2, 2)));
        world.get_mut(corpse).unwrap().dead = true;
    }

    assert_eq!(
        apply(&mut world, eater, Decision::bare(Action::Eat)),
        Effect::Ate { corpses: 2 }
    );
    assert_eq!(world.len(), 1);
    assert_eq!(world.get(eater).unwrap().score, 10);

    let effect = apply(
        &mut world,
        eater,
        Decision::bare(Action::Duplicate {
            to: Position::new(3, 2),
        }),
    );
    let Effect::Duplicated { child } = effect else {
        panic!("expected a duplicate, got {effect:?}");
    };
    assert_eq!(world.get(eater).unwrap().score, 9);
    let child = world.get(child).unwrap();
    assert_eq!(child.position, Position::new(3, 2));
    assert!(child.just_duplicated);
    assert!(!child.active);
}
