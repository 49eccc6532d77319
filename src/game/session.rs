//! A game in progress.

use tracing::{debug, info};

use crate::config::Rules;
use crate::error::{BoardError, MoveError, UndoUnavailable};
use crate::game::invariants::{assert_invariants, check_structure};
use crate::game::{
    Board, Cascade, MoveOutcome, NodeId, PlayerId, Position, Roster, SnapshotStore, Step,
    TurnOrder, validate,
};

/// One game: who is playing, the live position, the undo history and the
/// rules in force.
///
/// Moves go through [`Session::place`], which resolves the whole cascade, or
/// through [`Session::begin`] followed by repeated [`Session::step`] calls
/// when the caller wants to reveal a cascade gradually. While a cascade is
/// being stepped no other move is accepted.
#[derive(Debug, Clone)]
pub struct Session {
    roster: Roster,
    live: Position,
    history: SnapshotStore,
    rules: Rules,
    last_outcome: Option<MoveOutcome>,
}

impl Session {
    /// Start a game on `board`, with the first seat to move.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty or its adjacency is malformed.
    pub fn new(board: Board, roster: Roster, rules: Rules) -> Result<Self, BoardError> {
        if board.is_empty() {
            return Err(BoardError::Empty);
        }
        check_structure(&board)?;

        let turn = TurnOrder::new(roster.len());
        debug!(
            nodes = board.total_nodes(),
            players = roster.len(),
            "session started"
        );
        Ok(Self {
            roster,
            live: Position::new(board, turn),
            history: SnapshotStore::new(),
            rules,
            last_outcome: None,
        })
    }

    /// The live board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.live.board
    }

    /// The live position.
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.live
    }

    /// The players.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Rules in force.
    #[must_use]
    pub const fn rules(&self) -> Rules {
        self.rules
    }

    /// Player to move.
    #[must_use]
    pub const fn current_player(&self) -> PlayerId {
        self.live.turn.current()
    }

    /// Owner of the whole board, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.live.board.winner()
    }

    /// Check if the game has been won.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.live.board.has_winner()
    }

    /// Check if a stepped cascade is still in flight.
    #[must_use]
    pub const fn is_resolving(&self) -> bool {
        !self.live.is_settled()
    }

    /// Outcome of the most recently settled move.
    #[must_use]
    pub const fn last_outcome(&self) -> Option<MoveOutcome> {
        self.last_outcome
    }

    /// Check if there is a move to take back.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Number of moves that can be taken back.
    #[must_use]
    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    /// Forget all but the newest `keep` moves, limiting how far back
    /// [`Session::undo`] can go.
    pub fn keep_history(&mut self, keep: usize) {
        self.history.keep_newest(keep);
    }

    /// Play `node` for the player to move and resolve the whole cascade.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the game untouched, if the move is refused.
    pub fn place(&mut self, node: NodeId) -> Result<MoveOutcome, MoveError> {
        let cascade = self.start_move(node)?;
        let outcome = cascade.run(&mut self.live.board);
        Ok(self.settle(outcome))
    }

    /// Play `node` for the player to move without resolving the cascade.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the game untouched, if the move is refused.
    pub fn begin(&mut self, node: NodeId) -> Result<(), MoveError> {
        let cascade = self.start_move(node)?;
        self.live.cascade = Some(cascade);
        Ok(())
    }

    /// Advance the in-flight cascade by one pop.
    ///
    /// Returns `None` if no cascade is in flight. When the returned step is
    /// terminal the move has settled and the turn has passed on.
    pub fn step(&mut self) -> Option<Step> {
        let mut cascade = self.live.cascade.take()?;
        let step = cascade.step(&mut self.live.board);
        if step.is_terminal() {
            let outcome = cascade.finish(&self.live.board);
            self.settle(outcome);
        } else {
            self.live.cascade = Some(cascade);
        }
        Some(step)
    }

    /// Take back the last move.
    ///
    /// A cascade still in flight is discarded along with its move.
    ///
    /// # Errors
    ///
    /// Returns [`UndoUnavailable`] if no move has been played.
    pub fn undo(&mut self) -> Result<(), UndoUnavailable> {
        self.live = self.history.undo()?;
        self.last_outcome = None;
        debug!(
            player = self.current_player(),
            depth = self.history.depth(),
            "move undone"
        );
        Ok(())
    }

    /// Check the move, snapshot the position and drop the token.
    fn start_move(&mut self, node: NodeId) -> Result<Cascade, MoveError> {
        if self.is_resolving() {
            return Err(MoveError::Resolving);
        }
        let player = self.current_player();
        validate(&self.live.board, node, player)?;
        self.history.commit(&self.live)?;
        Cascade::start(&mut self.live.board, node, player, self.rules.overflow_limit)
    }

    /// Close a move: check the board and pass the turn unless it was won.
    fn settle(&mut self, outcome: MoveOutcome) -> MoveOutcome {
        assert_invariants(&self.live.board);
        match outcome.winner {
            Some(player) => info!(player, "game won"),
            None => {
                let next = self.live.turn.advance(&self.live.board);
                debug!(
                    firings = outcome.firings,
                    overflowed = outcome.overflowed,
                    next,
                    "move settled"
                );
            }
        }
        self.last_outcome = Some(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Placement;

    fn id(raw: u32) -> NodeId {
        NodeId::new(raw)
    }

    fn grid_2x2() -> Board {
        let mut board = Board::new();
        for _ in 0..4 {
            board.add_node(Placement::default());
        }
        for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            board.connect(id(a), id(b)).unwrap();
        }
        board
    }

    fn session(players: usize) -> Session {
        Session::new(
            grid_2x2(),
            Roster::with_players(players).unwrap(),
            Rules::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_boards() {
        let roster = Roster::with_players(2).unwrap();
        assert_eq!(
            Session::new(Board::new(), roster.clone(), Rules::default()).unwrap_err(),
            BoardError::Empty
        );

        let mut board = grid_2x2();
        board.link_one_way(id(0), id(3));
        assert_eq!(
            Session::new(board, roster, Rules::default()).unwrap_err(),
            BoardError::Asymmetric {
                from: id(0),
                to: id(3)
            }
        );
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = session(2);
        assert_eq!(game.current_player(), 1);
        game.place(id(0)).unwrap();
        assert_eq!(game.current_player(), 2);
        game.place(id(3)).unwrap();
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.history_depth(), 2);
    }

    #[test]
    fn test_refused_move_keeps_turn_and_history() {
        let mut game = session(2);
        game.place(id(0)).unwrap();
        let before = game.position().clone();

        let err = game.place(id(0)).unwrap_err();
        assert_eq!(err, MoveError::Occupied { node: id(0), owner: 1 });
        assert_eq!(game.position(), &before);
        assert_eq!(game.history_depth(), 1);
    }

    #[test]
    fn test_capture_chain_wins_game() {
        let mut game = session(2);
        game.place(id(0)).unwrap();
        game.place(id(3)).unwrap();
        let outcome = game.place(id(0)).unwrap();
        assert_eq!(outcome.firings, 1);
        assert_eq!(game.board().tally_for(1), 3);

        // Player 2 fires node 3, recaptures 1 and 2, and node 2 fires again.
        let outcome = game.place(id(3)).unwrap();
        assert_eq!(outcome.winner, Some(2));
        assert_eq!(outcome.firings, 2);
        assert!(game.is_over());
        assert_eq!(game.board().total_tokens(), 4);

        // The winner keeps the turn and nobody can move.
        assert_eq!(game.current_player(), 2);
        assert_eq!(game.place(id(1)), Err(MoveError::GameOver(2)));
    }

    #[test]
    fn test_undo_restores_exact_position() {
        let mut game = session(2);
        game.place(id(0)).unwrap();
        let before = game.position().clone();
        game.place(id(3)).unwrap();

        game.undo().unwrap();
        assert_eq!(game.position(), &before);
        assert_eq!(game.current_player(), 2);

        game.undo().unwrap();
        assert_eq!(game.board(), &grid_2x2());
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.undo(), Err(UndoUnavailable));
    }

    #[test]
    fn test_keep_history_limits_undo() {
        let mut game = session(2);
        game.place(id(0)).unwrap();
        game.place(id(3)).unwrap();
        let before = game.position().clone();
        game.place(id(0)).unwrap();
        assert_eq!(game.history_depth(), 3);

        game.keep_history(1);
        assert_eq!(game.history_depth(), 1);
        game.undo().unwrap();
        assert_eq!(game.position(), &before);
        assert_eq!(game.undo(), Err(UndoUnavailable));
    }

    #[test]
    fn test_stepped_move_matches_place() {
        let mut stepped = session(2);
        let mut direct = session(2);
        for game in [&mut stepped, &mut direct] {
            game.place(id(0)).unwrap();
            game.place(id(3)).unwrap();
        }

        stepped.begin(id(0)).unwrap();
        assert!(stepped.is_resolving());
        assert_eq!(stepped.place(id(1)), Err(MoveError::Resolving));
        assert_eq!(stepped.begin(id(1)), Err(MoveError::Resolving));

        let mut steps = Vec::new();
        while let Some(step) = stepped.step() {
            steps.push(step);
        }
        assert_eq!(steps.first(), Some(&Step::Fired(id(0))));
        assert_eq!(steps.last(), Some(&Step::Settled));
        assert!(!stepped.is_resolving());

        let outcome = direct.place(id(0)).unwrap();
        assert_eq!(stepped.last_outcome(), Some(outcome));
        assert_eq!(stepped.position(), direct.position());
        assert_eq!(stepped.step(), None);
    }

    #[test]
    fn test_undo_mid_cascade_discards_move() {
        let mut game = session(2);
        game.place(id(0)).unwrap();
        game.place(id(3)).unwrap();
        let before = game.position().clone();

        game.begin(id(0)).unwrap();
        game.step().unwrap();
        game.undo().unwrap();

        assert!(!game.is_resolving());
        assert_eq!(game.position(), &before);
        assert_eq!(game.current_player(), 1);
    }

    #[test]
    fn test_eliminated_player_skipped() {
        // K4 on nodes 0..=3 plus an isolated node 4.
        let mut board = Board::new();
        for _ in 0..5 {
            board.add_node(Placement::default());
        }
        for a in 0..4 {
            for b in (a + 1)..4 {
                board.connect(id(a), id(b)).unwrap();
            }
        }
        let mut game = Session::new(board, Roster::with_players(3).unwrap(), Rules::default())
            .unwrap();

        for raw in [0, 4, 1, 0, 2, 3] {
            game.place(id(raw)).unwrap();
        }
        assert!(game.board().is_full());

        // Seat 1 fires node 0 and takes seat 3's only node.
        let outcome = game.place(id(0)).unwrap();
        assert_eq!(outcome.firings, 1);
        assert_eq!(game.board().tally_for(3), 0);
        assert_eq!(game.current_player(), 2);

        game.place(id(4)).unwrap();
        assert_eq!(game.current_player(), 1);
    }
}
