//! Error types for the board and the cascade engine.

use thiserror::Error;

use crate::game::{NodeId, PlayerId};

/// Structural misuse of a board or of the snapshot store.
///
/// These are contract failures on the caller's side. Correct callers never
/// see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The node is not (or no longer) part of the board.
    #[error("node {0} is not on the board")]
    NotAMember(NodeId),
    /// A node cannot be its own neighbour.
    #[error("node {0} cannot be adjacent to itself")]
    SelfLoop(NodeId),
    /// An edge exists in one direction only.
    #[error("edge {from} -> {to} has no reverse edge")]
    Asymmetric {
        /// Node whose list holds the edge.
        from: NodeId,
        /// Node missing the reverse edge.
        to: NodeId,
    },
    /// The board has no nodes.
    #[error("board has no nodes")]
    Empty,
    /// A snapshot was requested while a cascade is still resolving.
    #[error("cannot snapshot while a cascade is still resolving")]
    CascadeInProgress,
}

/// A placement the engine refused. The board is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The target belongs to another player.
    #[error("node {node} is owned by player {owner}")]
    Occupied {
        /// Requested node.
        node: NodeId,
        /// Its current owner.
        owner: PlayerId,
    },
    /// The target is not on the board.
    #[error("node {0} is not on the board")]
    UnknownNode(NodeId),
    /// The acting player id is out of range.
    #[error("player {0} is not in the game")]
    UnknownPlayer(PlayerId),
    /// Somebody already owns every node.
    #[error("game is over, player {0} owns the board")]
    GameOver(PlayerId),
    /// An earlier move is still being resolved step by step.
    #[error("a cascade is still resolving")]
    Resolving,
    /// A board contract was broken while committing the move.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// There is no earlier position to go back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("nothing to undo")]
pub struct UndoUnavailable;
