// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
#![cfg_attr(test, allow(clippy::float_cmp))]
//! Splode: chain-reaction territory capture on arbitrary graphs.
//!
//! Players take turns dropping tokens on nodes they own (or that nobody owns
//! yet). A node holding as many tokens as it has neighbours fires: it hands one
//! token to every neighbour and captures them, which can set off further
//! firings. Whoever owns every node wins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (play / run / soak)           │
//! ├─────────────────────────────────────┤
//! │   Session: turns + undo history     │
//! ├─────────────────────────────────────┤
//! │   Cascade engine (LIFO worklist)    │
//! ├─────────────────────────────────────┤
//! │   Board graph    │   Topologies     │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod soak;
pub mod topology;

pub use config::{Config, ConfigError, Rules};
pub use error::{BoardError, MoveError, UndoUnavailable};

// Re-export key game types at crate root for convenience
pub use game::{
    Board, Cascade, DEFAULT_OVERFLOW_LIMIT, MAX_PLAYERS, MoveOutcome, Node, NodeId, Placement,
    Player, PlayerId, Position, Roster, Session, SnapshotStore, Step, TurnOrder, apply_move,
};
pub use topology::{Topology, TopologyError, generate};
