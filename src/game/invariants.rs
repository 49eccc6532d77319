//! Board invariants - sanity checks that detect engine bugs.
//!
//! A correctly implemented engine never trips these. They run after every
//! move in debug builds and in the soak harness.

use crate::error::BoardError;
use crate::game::board::tally_slot;
use crate::game::{Board, MAX_PLAYERS};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check the adjacency relation only.
///
/// # Errors
///
/// Returns the first structural defect found: a self-loop, an edge to a
/// missing node, or an edge without its reverse.
pub fn check_structure(board: &Board) -> Result<(), BoardError> {
    for id in board.ids() {
        for &other in board.neighbors(id) {
            if other == id {
                return Err(BoardError::SelfLoop(id));
            }
            if !board.contains(other) {
                return Err(BoardError::NotAMember(other));
            }
            if !board.neighbors(other).contains(&id) {
                return Err(BoardError::Asymmetric {
                    from: id,
                    to: other,
                });
            }
        }
    }
    Ok(())
}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if let Err(err) = check_structure(board) {
        violations.push(InvariantViolation {
            message: err.to_string(),
        });
    }

    // Tallies must match a recount of owners
    let mut owned = [0u32; MAX_PLAYERS];
    for (id, node) in board.iter() {
        let Some(owner) = node.owner() else {
            continue;
        };
        match tally_slot(owner) {
            Some(idx) => owned[idx] += 1,
            None => violations.push(InvariantViolation {
                message: format!("Node {id} owned by out-of-range player {owner}"),
            }),
        }
    }
    for (idx, (&kept, &counted)) in board.tallies().iter().zip(&owned).enumerate() {
        if kept != counted {
            violations.push(InvariantViolation {
                message: format!(
                    "Player {} tally {kept} but owns {counted} nodes",
                    idx + 1
                ),
            });
        }
    }

    let claimed = board.claimed() as usize;
    if claimed > board.total_nodes() {
        violations.push(InvariantViolation {
            message: format!(
                "Claimed {claimed} nodes on a board of {}",
                board.total_nodes()
            ),
        });
    }

    violations
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(board: &Board) {
    let violations = check_invariants(board);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_board: &Board) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{NodeId, Placement};

    fn triangle() -> Board {
        let mut board = Board::new();
        let ids: Vec<_> = (0..3).map(|_| board.add_node(Placement::default())).collect();
        board.connect(ids[0], ids[1]).unwrap();
        board.connect(ids[1], ids[2]).unwrap();
        board.connect(ids[2], ids[0]).unwrap();
        board
    }

    #[test]
    fn test_valid_board_passes() {
        let mut board = triangle();
        board.deposit(NodeId::new(0), 1);
        board.deposit(NodeId::new(1), 2);
        assert!(check_invariants(&board).is_empty());
        assert_eq!(check_structure(&board), Ok(()));
    }

    #[test]
    fn test_detects_tally_mismatch() {
        let mut board = triangle();
        board.deposit(NodeId::new(0), 1);
        board.set_tally(1, 2);

        let violations = check_invariants(&board);
        assert!(!violations.is_empty());
        assert!(violations[0].message.contains("Player 1 tally 2"));
    }

    #[test]
    fn test_detects_tally_above_total() {
        let mut board = triangle();
        board.set_tally(3, 7);
        let violations = check_invariants(&board);
        assert!(violations.iter().any(|v| v.message.contains("Claimed 7")));
    }

    #[test]
    fn test_detects_owner_without_tally() {
        let mut board = triangle();
        board.node_mut(NodeId::new(2)).unwrap().owner = Some(4);
        let violations = check_invariants(&board);
        assert!(violations.iter().any(|v| v.message.contains("Player 4 tally 0")));
    }

    #[test]
    fn test_detects_one_way_edge() {
        let mut board = Board::new();
        let a = board.add_node(Placement::default());
        let b = board.add_node(Placement::default());
        board.link_one_way(a, b);
        assert_eq!(
            check_structure(&board),
            Err(BoardError::Asymmetric { from: a, to: b })
        );
    }

    #[test]
    fn test_detects_self_loop() {
        let mut board = Board::new();
        let a = board.add_node(Placement::default());
        board.link_one_way(a, a);
        assert_eq!(check_structure(&board), Err(BoardError::SelfLoop(a)));
        assert_eq!(check_invariants(&board).len(), 1);
    }

    #[test]
    #[should_panic(expected = "Board invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let mut board = triangle();
        board.set_tally(1, 1);
        assert_invariants(&board);
    }
}
