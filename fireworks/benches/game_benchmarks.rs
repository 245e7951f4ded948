use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fireworks::{
    Game, GameSettings, GameState, Mode, Move, PlayerId,
    entities::HintAttribute,
    snapshot,
};
use rand::{SeedableRng, rngs::StdRng};
use std::hint::black_box;

/// Helper to create a started game with N players
fn setup_game(mode: Mode, n_players: usize, rng: &mut StdRng) -> Game {
    let settings = GameSettings {
        mode,
        ..GameSettings::default()
    };
    let mut game = Game::with_settings("bench".to_string(), "bench", settings).unwrap();
    for i in 0..n_players {
        game.add_player(PlayerId::new(&format!("player{i}")), "player")
            .unwrap();
    }
    game.start_with_rng(rng).unwrap();
    game
}

/// Benchmark dealing a fresh game
fn bench_start(c: &mut Criterion) {
    let mut group = c.benchmark_group("start_game");
    for n_players in [2, 3, 4, 5] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, &n| {
                let mut rng = StdRng::seed_from_u64(1);
                b.iter(|| setup_game(Mode::Normal, n, &mut rng));
            },
        );
    }
    group.finish();
}

/// Benchmark a single discard, which includes the draw and both score
/// recomputations
fn bench_discard(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let game = setup_game(Mode::Rainbow, 4, &mut rng);

    c.bench_function("discard_move", |b| {
        b.iter(|| {
            let mut game = game.clone();
            let actor = game.current_player().unwrap().id.clone();
            black_box(
                game.process_move_with_rng(&actor, Move::Discard { card_index: 0 }, &mut rng)
                    .unwrap(),
            );
        });
    });
}

/// Benchmark a rank hint across a full hand
fn bench_hint(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let game = setup_game(Mode::Wildcard, 5, &mut rng);
    let actor_seat = game.table().current_player_index();
    let target = game.players()[(actor_seat + 1) % 5].id.clone();

    c.bench_function("rank_hint_move", |b| {
        b.iter(|| {
            let mut game = game.clone();
            let actor = game.current_player().unwrap().id.clone();
            let hint = Move::Hint {
                target: target.clone(),
                attribute: HintAttribute::Rank,
                card_index: 0,
                color: None,
            };
            black_box(game.process_move_with_rng(&actor, hint, &mut rng).unwrap());
        });
    });
}

/// Benchmark playing a whole game of discards to the end
fn bench_full_game(c: &mut Criterion) {
    c.bench_function("full_game_discards", |b| {
        let mut rng = StdRng::seed_from_u64(4);
        b.iter(|| {
            let mut game = setup_game(Mode::Hard, 3, &mut rng);
            while game.state() == GameState::Started {
                let actor = game.current_player().unwrap().id.clone();
                game.process_move_with_rng(&actor, Move::Discard { card_index: 0 }, &mut rng)
                    .unwrap();
            }
            black_box(game.score())
        });
    });
}

/// Benchmark the redacted view built for every player
fn bench_create_states(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(5);
    let game = setup_game(Mode::Normal, 5, &mut rng);

    c.bench_function("create_states_5_players", |b| {
        b.iter(|| black_box(game.create_states()));
    });
}

/// Benchmark snapshot encoding
fn bench_snapshot(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(6);
    let game = setup_game(Mode::Rainbow, 4, &mut rng);

    c.bench_function("snapshot_encode", |b| {
        b.iter(|| black_box(snapshot::encode(&game).unwrap()));
    });

    let bytes = snapshot::encode(&game).unwrap();
    c.bench_function("snapshot_decode", |b| {
        b.iter(|| black_box(snapshot::decode(&bytes).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_start,
    bench_discard,
    bench_hint,
    bench_full_game,
    bench_create_states,
    bench_snapshot
);
criterion_main!(benches);
