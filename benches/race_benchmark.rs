//! Benchmarks for movement resolution and complete races.
//!
//! `full_race_*` covers the runner loop a tournament spends its time in.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use camelrace::bot::PolicyKind;
use camelrace::game::{resolve, Board, Camel, CamelColor, Tile, TileKind};
use camelrace::sim::{run_race, SimConfig};
use camelrace::RaceConfig;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_resolve(c: &mut Criterion) {
    let mut board = Board::new(
        16,
        vec![
            Camel::new(CamelColor::Red, 3, 0),
            Camel::new(CamelColor::Blue, 3, 1),
            Camel::new(CamelColor::Green, 3, 2),
            Camel::new(CamelColor::Yellow, 6, 0),
            Camel::new(CamelColor::Purple, 7, 0),
            Camel::new(CamelColor::White, 12, 0),
            Camel::new(CamelColor::Black, 12, 1),
        ],
    );
    board.place_tile(Tile::new(5, TileKind::Oasis, 1));

    c.bench_function("resolve_stack_onto_tile", |b| {
        b.iter(|| resolve(black_box(&board), black_box(CamelColor::Blue), black_box(2)));
    });
}

fn bench_full_race_2p(c: &mut Criterion) {
    let kinds = [PolicyKind::Leader, PolicyKind::Random];
    let config = RaceConfig::classic();
    let sim = SimConfig::default();

    c.bench_function("full_race_2p", |b| {
        b.iter(|| {
            let result = run_race(black_box(42), black_box(&kinds), &config, &sim);
            black_box(result)
        });
    });
}

fn bench_full_race_full_rules_4p(c: &mut Criterion) {
    let kinds = [
        PolicyKind::Leader,
        PolicyKind::Random,
        PolicyKind::Random,
        PolicyKind::Roll,
    ];
    let config = RaceConfig::full();
    let sim = SimConfig::default();

    c.bench_function("full_race_full_rules_4p", |b| {
        b.iter(|| {
            let result = run_race(black_box(42), black_box(&kinds), &config, &sim);
            black_box(result)
        });
    });
}

fn bench_many_seeds(c: &mut Criterion) {
    let kinds = [PolicyKind::Random, PolicyKind::Random, PolicyKind::Random];
    let config = RaceConfig::crazy();
    let sim = SimConfig::default();

    c.bench_function("races_100_seeds", |b| {
        b.iter(|| {
            for seed in 0..100u64 {
                black_box(run_race(seed, &kinds, &config, &sim).unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_full_race_2p,
    bench_full_race_full_rules_4p,
    bench_many_seeds
);
criterion_main!(benches);
