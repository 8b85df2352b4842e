//! Lobby and session benchmarks
//!
//! Run with: cargo bench --bench lobby

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pest_control_server::config::MinigameConfig;
use pest_control_server::lobby::boat::{BoatQueue, BoatTier};
use pest_control_server::lobby::task::BoatLobbyTask;
use pest_control_server::minigame::pest_control::PestControl;
use pest_control_server::util::direction::Direction;
use pest_control_server::world::sim::SimWorld;
use rand::Rng;

/// A boat with `count` players aboard and a lobby that launches every tick
fn create_boat(count: usize) -> (BoatLobbyTask, BoatQueue, SimWorld) {
    let config = MinigameConfig {
        boat_wait_ticks: 1,
        ..MinigameConfig::default()
    };
    let lobby = BoatLobbyTask::new(BoatTier::Novice, &config);
    let mut queue = BoatQueue::new(BoatTier::Novice);
    let mut world = SimWorld::new();
    for i in 0..count {
        let id = world.add_player(format!("Player{}", i), BoatTier::Novice.enter_location());
        let _ = queue.enqueue(id);
    }
    (lobby, queue, world)
}

/// Benchmark draining a crowded boat one launch at a time
fn bench_lobby_launch(c: &mut Criterion) {
    let mut group = c.benchmark_group("lobby_launch");
    group.sample_size(50);

    for count in [25, 100, 500] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("drain", count), &count, |b, &count| {
            b.iter_batched(
                || create_boat(count),
                |(mut lobby, mut queue, mut world)| {
                    while !queue.is_empty() {
                        black_box(lobby.run(&mut queue, &mut world));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark a full game from boarding to settlement
fn bench_full_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    group.sample_size(20);

    for players in [2, 25] {
        group.bench_with_input(BenchmarkId::new("to_settlement", players), &players, |b, &players| {
            b.iter(|| {
                let config = MinigameConfig {
                    boat_wait_ticks: 1,
                    game_duration_ticks: 100,
                    ..MinigameConfig::default()
                };
                let (mut ctx, mut tasks) = PestControl::start(config, SimWorld::new());
                for i in 0..players {
                    let id = ctx.world.add_player(format!("Player{}", i), BoatTier::Veteran.enter_location());
                    let _ = ctx.minigame.join_queue(&mut ctx.world, id, BoatTier::Veteran);
                }
                for _ in 0..102 {
                    black_box(tasks.process(&mut ctx));
                }
                ctx.minigame.stats()
            });
        });
    }

    group.finish();
}

/// Benchmark delta classification
fn bench_direction(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let deltas: Vec<(i32, i32)> = (0..1024)
        .map(|_| (rng.gen_range(-5..=5), rng.gen_range(-5..=5)))
        .collect();

    let mut group = c.benchmark_group("direction");
    group.throughput(Throughput::Elements(deltas.len() as u64));
    group.bench_function("from_deltas", |b| {
        b.iter(|| {
            deltas
                .iter()
                .map(|&(dx, dy)| Direction::from_deltas(dx, dy).client_value() as u64)
                .sum::<u64>()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_lobby_launch, bench_full_session, bench_direction);
criterion_main!(benches);
