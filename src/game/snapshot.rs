//! Positions and the undo history.

use tracing::trace;

use crate::error::{BoardError, UndoUnavailable};
use crate::game::{Board, Cascade, TurnOrder};

/// Everything that changes during play: the board, whose turn it is, and the
/// move being resolved, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) turn: TurnOrder,
    pub(crate) cascade: Option<Cascade>,
}

impl Position {
    /// A settled position.
    #[must_use]
    pub const fn new(board: Board, turn: TurnOrder) -> Self {
        Self {
            board,
            turn,
            cascade: None,
        }
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The turn order.
    #[must_use]
    pub const fn turn(&self) -> TurnOrder {
        self.turn
    }

    /// The move still being resolved, if any.
    #[must_use]
    pub const fn cascade(&self) -> Option<&Cascade> {
        self.cascade.as_ref()
    }

    /// Check if no move is in flight.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.cascade.is_none()
    }
}

/// Stack of positions taken just before each committed move, newest last.
///
/// Stored positions are never modified. Undo hands back the newest one and
/// forgets it; there is no redo.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    frames: Vec<Position>,
}

impl SnapshotStore {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copy of `position`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CascadeInProgress`] if a move is still being
    /// resolved in `position`.
    pub fn commit(&mut self, position: &Position) -> Result<(), BoardError> {
        if !position.is_settled() {
            return Err(BoardError::CascadeInProgress);
        }
        self.frames.push(position.clone());
        trace!(depth = self.frames.len(), "snapshot committed");
        Ok(())
    }

    /// Take back the newest snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`UndoUnavailable`] if the history is empty.
    pub fn undo(&mut self) -> Result<Position, UndoUnavailable> {
        let position = self.frames.pop().ok_or(UndoUnavailable)?;
        trace!(depth = self.frames.len(), "snapshot restored");
        Ok(position)
    }

    /// Forget all but the newest `keep` snapshots.
    pub fn keep_newest(&mut self, keep: usize) {
        let excess = self.frames.len().saturating_sub(keep);
        if excess > 0 {
            self.frames.drain(..excess);
            trace!(depth = self.frames.len(), dropped = excess, "history trimmed");
        }
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DEFAULT_OVERFLOW_LIMIT, NodeId, Placement};

    fn position() -> Position {
        let mut board = Board::new();
        let a = board.add_node(Placement::default());
        let b = board.add_node(Placement::default());
        board.connect(a, b).unwrap();
        Position::new(board, TurnOrder::new(2))
    }

    #[test]
    fn test_undo_on_empty_store() {
        let mut store = SnapshotStore::new();
        assert!(!store.can_undo());
        assert_eq!(store.undo(), Err(UndoUnavailable));
    }

    #[test]
    fn test_commit_then_undo_returns_exact_copy() {
        let mut store = SnapshotStore::new();
        let mut live = position();
        store.commit(&live).unwrap();
        let before = live.clone();

        live.board.deposit(NodeId::new(0), 1);
        live.turn.advance(&live.board);
        assert_ne!(live, before);

        let restored = store.undo().unwrap();
        assert_eq!(restored, before);
        assert_eq!(store.depth(), 0);
    }

    #[test]
    fn test_snapshots_are_independent_of_live_board() {
        let mut store = SnapshotStore::new();
        let mut live = position();
        store.commit(&live).unwrap();

        live.board.remove_node(NodeId::new(1)).unwrap();
        let restored = store.undo().unwrap();
        assert_eq!(restored.board().total_nodes(), 2);
        assert_eq!(restored.board().degree(NodeId::new(0)), Some(1));
    }

    #[test]
    fn test_commit_rejected_mid_cascade() {
        let mut store = SnapshotStore::new();
        let mut live = position();
        let cascade =
            Cascade::start(&mut live.board, NodeId::new(0), 1, DEFAULT_OVERFLOW_LIMIT).unwrap();
        live.cascade = Some(cascade);

        assert!(!live.is_settled());
        assert_eq!(store.commit(&live), Err(BoardError::CascadeInProgress));
        assert_eq!(store.depth(), 0);
    }

    #[test]
    fn test_repeated_undo_walks_back() {
        let mut store = SnapshotStore::new();
        let mut live = position();
        let initial = live.clone();
        for _ in 0..3 {
            store.commit(&live).unwrap();
            live.board.deposit(NodeId::new(1), 2);
        }
        assert_eq!(store.depth(), 3);

        let mut last = None;
        while let Ok(previous) = store.undo() {
            last = Some(previous);
        }
        assert_eq!(last, Some(initial));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_keep_newest_drops_oldest_frames() {
        let mut store = SnapshotStore::new();
        let mut live = position();
        for _ in 0..4 {
            store.commit(&live).unwrap();
            live.board.deposit(NodeId::new(1), 2);
        }
        let newest = {
            let mut copy = store.clone();
            copy.undo().unwrap()
        };

        store.keep_newest(1);
        assert_eq!(store.depth(), 1);
        assert_eq!(store.undo(), Ok(newest));
        assert!(!store.can_undo());

        // Trimming a short history is a no-op
        store.commit(&live).unwrap();
        store.keep_newest(5);
        assert_eq!(store.depth(), 1);
    }
}
