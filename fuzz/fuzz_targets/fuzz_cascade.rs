#![no_main]

//! Cascade fuzzer on arbitrary graphs.
//!
//! Builds a board from fuzzer-chosen nodes and edges (self-loops and
//! duplicates included, which the board must reject or absorb), removes some
//! nodes, then plays arbitrary moves with a small overflow guard. After every
//! move the tallies, the adjacency and the token count must still add up.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use splode::game::invariants::check_invariants;
use splode::{Board, NodeId, Placement, apply_move};

/// Structured input for cascade fuzzing.
#[derive(Arbitrary, Debug)]
struct CascadeInput {
    /// Number of nodes (capped at 64).
    nodes: u8,
    /// Edges as raw id pairs.
    edges: Vec<(u8, u8)>,
    /// Nodes to remove before play.
    removals: Vec<u8>,
    /// Moves as (node, player).
    moves: Vec<(u8, u8)>,
    /// Overflow guard for every move.
    limit: u16,
}

fuzz_target!(|input: CascadeInput| {
    let mut board = Board::new();
    for _ in 0..input.nodes.min(64) {
        board.add_node(Placement::default());
    }
    for &(a, b) in input.edges.iter().take(512) {
        let (a, b) = (NodeId::new(u32::from(a)), NodeId::new(u32::from(b)));
        if board.connect(a, b).is_ok() {
            assert!(board.neighbors(a).contains(&b));
            assert!(board.neighbors(b).contains(&a));
        }
    }
    for &raw in &input.removals {
        let _ = board.remove_node(NodeId::new(u32::from(raw)));
    }

    let limit = u32::from(input.limit).min(2_000);
    for &(node, player) in input.moves.iter().take(256) {
        let tokens = board.total_tokens();
        let before = board.clone();
        match apply_move(&mut board, NodeId::new(u32::from(node)), player, limit) {
            Ok(outcome) => {
                assert_eq!(board.total_tokens(), tokens + 1);
                assert_eq!(outcome.winner, board.winner());
            }
            Err(_) => assert_eq!(board, before),
        }
        let violations = check_invariants(&board);
        assert!(violations.is_empty(), "{violations:?}");
    }
});
