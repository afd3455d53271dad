use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;
use tourney_core::{
    ConnectionGraph, MatchGenerator, RosterState,
    matching::Endpoint,
    roster::{MatchType, NewPlayer, RankAssignMode, RankCategory, RankCode},
};

const SCHOOLS: i64 = 8;

/// Random pairing graph over `n_players` players spread across the schools
fn random_graph(n_players: i64, n_connections: usize) -> ConnectionGraph {
    let mut rng = StdRng::seed_from_u64(7);
    let mut graph = ConnectionGraph::new();

    while graph.len() < n_connections {
        let a = rng.random_range(1..=n_players);
        let b = rng.random_range(1..=n_players);
        let category = RankCategory::ALL[rng.random_range(0..RankCategory::ALL.len())];
        let Ok(rank) = RankCode::new(category, rng.random_range(1..=3)) else {
            continue;
        };
        let from = Endpoint::new(a, a % SCHOOLS + 1);
        let to = Endpoint::new(b, b % SCHOOLS + 1);
        // Same-school and duplicate edges are rejected; draw again
        let _ = graph.add_connection(from, to, rank);
    }

    graph
}

/// Roster with `n_players` players, each holding a few ranks
fn populated_roster(n_players: i64) -> RosterState {
    let mut rng = StdRng::seed_from_u64(11);
    let mut roster = RosterState::default();
    for i in 0..SCHOOLS {
        roster.add_school(&format!("School {i}")).unwrap();
    }
    for i in 0..n_players {
        let ranks = (0..3).filter_map(|_| {
            let category = RankCategory::ALL[rng.random_range(0..RankCategory::ALL.len())];
            RankCode::new(category, rng.random_range(1..=4)).ok()
        });
        roster
            .add_player(
                NewPlayer::named(format!("player{i}"))
                    .in_school(i % SCHOOLS + 1)
                    .with_ranks(ranks),
            )
            .unwrap();
    }
    roster
}

/// Benchmark dual generation over growing pairing graphs
fn bench_generate_dual(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_dual");

    for n_connections in [50, 500, 5000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_connections", n_connections)),
            n_connections,
            |b, &n| {
                let graph = random_graph(2000, n);
                b.iter(|| MatchGenerator::new(black_box(&graph)).generate(MatchType::Dual));
            },
        );
    }

    group.finish();
}

/// Benchmark component discovery alone
fn bench_components(c: &mut Criterion) {
    let graph = random_graph(2000, 2000);
    c.bench_function("components_2000_connections", |b| {
        b.iter(|| MatchGenerator::new(black_box(&graph)).components());
    });
}

/// Benchmark ledger rebuild, which every conflict check starts from
fn bench_ledger_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_build");

    for n_players in [100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            n_players,
            |b, &n| {
                let roster = populated_roster(n);
                b.iter(|| black_box(&roster).ledger());
            },
        );
    }

    group.finish();
}

/// Benchmark a bulk rank assignment with auto-resolution
fn bench_bulk_assign(c: &mut Criterion) {
    let roster = populated_roster(1000);
    let ids: Vec<i64> = (1..=200).collect();
    let ranks = vec![RankCode::new(RankCategory::MS, 1).unwrap()];

    c.bench_function("bulk_assign_200_players", |b| {
        b.iter_batched(
            || roster.clone(),
            |mut roster| {
                roster
                    .bulk()
                    .bulk_assign_ranks(&ids, &ranks, RankAssignMode::Add, true)
                    .unwrap()
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(generation, bench_generate_dual, bench_components);

criterion_group!(roster_operations, bench_ledger_build, bench_bulk_assign);

criterion_main!(generation, roster_operations);
