//! Benchmarks for cascade resolution and full playouts.
//!
//! The cascade loop is the hot path; snapshotting every move is the next
//! biggest cost.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use splode::soak::{SoakConfig, run_soak};
use splode::{
    Board, DEFAULT_OVERFLOW_LIMIT, NodeId, Roster, Rules, Session, Topology, apply_move, generate,
};

/// A grid where every node sits one token below firing, so a single
/// placement in the corner sets off a board-wide chain reaction.
fn primed_grid(size: usize) -> Board {
    let mut board = generate(Topology::Square { size }).unwrap();
    let ids: Vec<NodeId> = board.ids().collect();
    for id in ids {
        let degree = board.degree(id).unwrap();
        for _ in 1..degree {
            // Two players so the board is never won mid-setup
            let player = if id.raw() == 0 { 1 } else { 2 };
            apply_move(&mut board, id, player, DEFAULT_OVERFLOW_LIMIT).unwrap();
        }
    }
    board
}

fn bench_chain_reaction(c: &mut Criterion) {
    let board = primed_grid(12);

    c.bench_function("chain_reaction_12x12", |b| {
        b.iter(|| {
            let mut board = board.clone();
            let outcome =
                apply_move(&mut board, black_box(NodeId::new(0)), 1, DEFAULT_OVERFLOW_LIMIT);
            black_box(outcome)
        });
    });
}

fn bench_session_moves(c: &mut Criterion) {
    let board = generate(Topology::Square { size: 10 }).unwrap();
    let roster = Roster::with_players(2).unwrap();

    c.bench_function("session_100_moves_10x10", |b| {
        b.iter(|| {
            let mut session = Session::new(board.clone(), roster.clone(), Rules::default()).unwrap();
            for i in 0..100u32 {
                // Mirror moves keep both players on their own half
                let node = if i % 2 == 0 { (i / 2) % 50 } else { 99 - (i / 2) % 50 };
                let _ = session.place(black_box(NodeId::new(node)));
            }
            black_box(session.history_depth())
        });
    });
}

fn bench_soak_playout(c: &mut Criterion) {
    let config = SoakConfig {
        max_moves: 500,
        ..SoakConfig::default()
    };

    c.bench_function("soak_playout_diamond_9", |b| {
        b.iter(|| {
            let result = run_soak(black_box(42), Topology::Diamond { size: 9 }, 3, &config);
            black_box(result)
        });
    });
}

criterion_group!(
    benches,
    bench_chain_reaction,
    bench_session_moves,
    bench_soak_playout
);
criterion_main!(benches);
