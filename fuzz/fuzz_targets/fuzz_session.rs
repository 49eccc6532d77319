#![no_main]

//! Session fuzzer.
//!
//! Drives a session on a generated board with an arbitrary mix of whole
//! moves, stepped moves and undos. Undo must always restore the position
//! recorded before the matching move.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use splode::game::invariants::check_invariants;
use splode::{NodeId, Position, Roster, Rules, Session, Topology, generate};

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum Action {
    /// Play a whole move.
    Place(u8),
    /// Start a move and take a few steps.
    Step(u8, u8),
    /// Take back a move.
    Undo,
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    /// Shape selector.
    shape: u8,
    /// Shape size.
    size: u8,
    /// Seats.
    players: u8,
    /// Actions to apply.
    actions: Vec<Action>,
}

fn topology(shape: u8, size: u8) -> Topology {
    let size = usize::from(size % 8) + 3;
    match shape % 6 {
        0 => Topology::Rect { width: size, height: size - 1 },
        1 => Topology::Path { size },
        2 => Topology::Cycle { size },
        3 => Topology::Wheel { size },
        4 => Topology::Complete { size },
        _ => Topology::Diamond { size },
    }
}

fuzz_target!(|input: SessionInput| {
    let Ok(board) = generate(topology(input.shape, input.size)) else {
        return;
    };
    let Some(roster) = Roster::with_players(usize::from(input.players % 8) + 1) else {
        return;
    };
    let Ok(mut session) = Session::new(board, roster, Rules::default()) else {
        return;
    };
    let mut history: Vec<Position> = Vec::new();

    for action in input.actions.into_iter().take(200) {
        match action {
            Action::Place(node) => {
                let before = session.position().clone();
                if session.place(NodeId::new(u32::from(node))).is_ok() {
                    history.push(before);
                } else {
                    assert_eq!(session.position(), &before);
                }
            }
            Action::Step(node, steps) => {
                if session.is_resolving() {
                    for _ in 0..steps {
                        session.step();
                    }
                } else {
                    let before = session.position().clone();
                    if session.begin(NodeId::new(u32::from(node))).is_ok() {
                        history.push(before);
                        for _ in 0..steps {
                            session.step();
                        }
                    }
                }
            }
            Action::Undo => match history.pop() {
                Some(expected) => {
                    session.undo().unwrap();
                    assert_eq!(session.position(), &expected);
                }
                None => assert!(session.undo().is_err()),
            },
        }
        assert!(check_invariants(session.board()).is_empty());
        assert_eq!(session.history_depth(), history.len());
    }
});
