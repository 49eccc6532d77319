//! Turn order.

use crate::game::{Board, PlayerId};

/// Whose turn it is.
///
/// Seats are visited round-robin. Once every node is claimed, a player owning
/// nothing is out of the game and is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOrder {
    /// Seat index of the player to move, `0..players`.
    current: usize,
    /// Number of seats.
    players: usize,
}

impl TurnOrder {
    /// Start with the first seat to move. A zero seat count is treated as one.
    #[must_use]
    pub fn new(players: usize) -> Self {
        Self {
            current: 0,
            players: players.max(1),
        }
    }

    /// Seat index of the player to move.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Number of seats.
    #[must_use]
    pub const fn players(&self) -> usize {
        self.players
    }

    /// Player to move.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn current(&self) -> PlayerId {
        (self.current + 1) as PlayerId
    }

    /// Pass the turn to the next seat and return the new player to move.
    ///
    /// While the board is full, seats whose player owns no node are skipped.
    /// At most one full lap is taken, so the order settles even if nobody
    /// qualifies.
    pub fn advance(&mut self, board: &Board) -> PlayerId {
        let full = board.is_full();
        for _ in 0..self.players {
            self.current = (self.current + 1) % self.players;
            if !full || board.tally_for(self.current()) > 0 {
                break;
            }
        }
        self.current()
    }
}
