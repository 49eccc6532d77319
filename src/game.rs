//! Game layer for Splode.
//!
//! Implements the rules on top of a plain graph:
//! - Board with nodes, symmetric adjacency and per-player tallies
//! - Cascade resolution with an overflow guard
//! - Turn order that skips eliminated players
//! - Snapshot history for undo
//! - Session tying them together

pub(crate) mod board;
mod cascade;
pub mod invariants;
mod player;
mod session;
mod snapshot;
mod turn;

pub use board::{Board, Node, NodeId, Placement};
pub use cascade::{Cascade, DEFAULT_OVERFLOW_LIMIT, MoveOutcome, Step, apply_move, validate};
pub use player::{MAX_PLAYERS, Player, PlayerId, Roster};
pub use session::Session;
pub use snapshot::{Position, SnapshotStore};
pub use turn::TurnOrder;
