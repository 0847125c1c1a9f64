//! Benchmarks for parsing and disambiguation.
//!
//! Ambiguous programs grow their candidate lists quickly, so these track the
//! cost of building every tree and of dry-running them.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gridbots::arena::{Position, disambiguate};
use gridbots::lang::{parse, tokenize};
use gridbots::{Agent, World};
use rand::SeedableRng;
use rand::rngs::StdRng;

const PROGRAMS: [(&str, &str); 4] = [
    ("command", "shoot find enemy"),
    ("conditional", "if tick % 3 = 0 then dup right else move find dead -> eat"),
    ("direction_minus", "move here - up - left"),
    ("arithmetic_chain", "move (1 + 2 + 3 + 4 + 5 + 6, tick % 7)"),
];

fn bench_tokenize(c: &mut Criterion) {
    let source = PROGRAMS[1].1;
    c.bench_function("tokenize_conditional", |b| {
        b.iter(|| tokenize(black_box(source)));
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, source) in PROGRAMS {
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| parse(black_box(source)));
        });
    }
    group.finish();
}

fn bench_disambiguate(c: &mut Criterion) {
    let mut group = c.benchmark_group("disambiguate");
    for (name, source) in PROGRAMS {
        let parsed = parse(source).unwrap();
        let mut world = World::new(40, 20).unwrap();
        for i in 0..5 {
            world.spawn(|id| Agent::enemy(id, Position::new(i * 7, i * 3)));
        }
        let program = Arc::new(parsed.candidates()[0].clone());
        let player = world.spawn(|id| Agent::player(id, Position::new(20, 10), program));
        let rng = StdRng::seed_from_u64(42);

        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| disambiguate(black_box(parsed.candidates()), &world, &rng, player, 25));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_disambiguate);
criterion_main!(benches);
