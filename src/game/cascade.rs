//! Chain-reaction resolution.
//!
//! A move drops one token on a node and then drains a worklist, last in first
//! out. Each popped node fires if it holds at least as many tokens as it has
//! neighbours: it gives one token to each neighbour, the acting player
//! captures them, and they go on the worklist in turn.
//!
//! Resolution stops when the worklist is empty, when someone owns the whole
//! board, or when the overflow guard trips. Every firing conserves tokens, so
//! a move adds exactly one token to the board.

use tracing::{debug, info, trace, warn};

use crate::error::MoveError;
use crate::game::board::tally_slot;
use crate::game::{Board, NodeId, PlayerId};

/// Worklist pops allowed per move before the cascade is abandoned.
pub const DEFAULT_OVERFLOW_LIMIT: u32 = 30_000;

/// Summary of one resolved move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Number of nodes that fired.
    pub firings: u32,
    /// Number of worklist pops.
    pub steps: u32,
    /// The overflow guard tripped and the rest of the worklist was dropped.
    pub overflowed: bool,
    /// Owner of the whole board once the move settled.
    pub winner: Option<PlayerId>,
}

impl MoveOutcome {
    /// Check if at least one node fired.
    #[must_use]
    pub const fn fired(&self) -> bool {
        self.firings > 0
    }
}

/// Result of a single worklist pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The node fired and its neighbours were queued.
    Fired(NodeId),
    /// The node was below its degree.
    Idle(NodeId),
    /// Someone owns every node; the worklist was cleared.
    Won(PlayerId),
    /// The overflow guard tripped; the worklist was cleared.
    Overflow,
    /// Nothing left to process.
    Settled,
}

impl Step {
    /// Check if this step ends the cascade.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won(_) | Self::Overflow | Self::Settled)
    }
}

/// Check that `player` may place a token on `target`.
///
/// # Errors
///
/// Returns the reason the placement is refused.
pub fn validate(board: &Board, target: NodeId, player: PlayerId) -> Result<(), MoveError> {
    if tally_slot(player).is_none() {
        return Err(MoveError::UnknownPlayer(player));
    }
    let node = board.node(target).ok_or(MoveError::UnknownNode(target))?;
    if let Some(winner) = board.winner() {
        return Err(MoveError::GameOver(winner));
    }
    match node.owner() {
        Some(owner) if owner != player => Err(MoveError::Occupied {
            node: target,
            owner,
        }),
        _ => Ok(()),
    }
}

/// An in-flight move.
///
/// Created by [`Cascade::start`], which already placed the token. Drive it
/// with [`Cascade::step`] to reveal progress one pop at a time, or with
/// [`Cascade::run`] to resolve it at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    /// Player capturing every node touched by this move.
    player: PlayerId,
    /// Nodes waiting to be checked, popped from the back.
    worklist: Vec<NodeId>,
    /// Overflow guard.
    limit: u32,
    /// Progress so far.
    outcome: MoveOutcome,
}

impl Cascade {
    /// Validate the placement, drop the token and queue the target.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the board untouched, if the placement is not
    /// allowed.
    pub fn start(
        board: &mut Board,
        target: NodeId,
        player: PlayerId,
        limit: u32,
    ) -> Result<Self, MoveError> {
        validate(board, target, player)?;
        board.deposit(target, player);
        debug!(node = %target, player, "token placed");

        Ok(Self {
            player,
            worklist: vec![target],
            limit,
            outcome: MoveOutcome::default(),
        })
    }

    /// Pop one node from the worklist and fire it if it is full.
    pub fn step(&mut self, board: &mut Board) -> Step {
        if self.worklist.is_empty() {
            return Step::Settled;
        }
        // A won board ends the move before the guard can call it an overflow
        if let Some(winner) = board.winner() {
            info!(player = winner, "board captured");
            self.worklist.clear();
            self.outcome.winner = Some(winner);
            return Step::Won(winner);
        }
        if self.outcome.steps >= self.limit {
            warn!(
                limit = self.limit,
                pending = self.worklist.len(),
                "cascade overflow guard tripped, dropping worklist"
            );
            self.worklist.clear();
            self.outcome.overflowed = true;
            return Step::Overflow;
        }

        let Some(current) = self.worklist.pop() else {
            return Step::Settled;
        };
        self.outcome.steps += 1;

        match board.fire(current, self.player) {
            Some(targets) => {
                trace!(node = %current, spread = targets.len(), "node fired");
                self.worklist.extend_from_slice(targets);
                self.outcome.firings += 1;
                Step::Fired(current)
            }
            None => Step::Idle(current),
        }
    }

    /// Resolve the rest of the cascade.
    #[must_use]
    pub fn run(mut self, board: &mut Board) -> MoveOutcome {
        while !self.step(board).is_terminal() {}
        self.finish(board)
    }

    /// Close the move and report what happened.
    #[must_use]
    pub fn finish(mut self, board: &Board) -> MoveOutcome {
        self.outcome.winner = board.winner();
        self.outcome
    }

    /// Check if nothing is left on the worklist.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.worklist.is_empty()
    }

    /// Nodes still waiting, next to be popped last.
    #[must_use]
    pub fn pending(&self) -> &[NodeId] {
        &self.worklist
    }

    /// The player making this move.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Progress so far.
    #[must_use]
    pub const fn outcome(&self) -> MoveOutcome {
        self.outcome
    }
}

/// Place a token for `player` on `target` and resolve the chain reaction.
///
/// # Errors
///
/// Returns an error, leaving the board untouched, if the placement is not
/// allowed.
pub fn apply_move(
    board: &mut Board,
    target: NodeId,
    player: PlayerId,
    limit: u32,
) -> Result<MoveOutcome, MoveError> {
    let cascade = Cascade::start(board, target, player, limit)?;
    Ok(cascade.run(board))
}
