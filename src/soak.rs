//! Randomized playouts that hammer the engine and check it after every move.
//!
//! Provides a pure function interface: `(seed, topology, players) -> SoakResult`
//!
//! Each playout picks uniformly among the legal placements of the player to
//! move. After every move it checks:
//! - board invariants (tallies, symmetric adjacency)
//! - token conservation (exactly one token added)
//! - undo round trip (undo restores the exact pre-move position, and replaying
//!   the move reproduces the same result)

use thiserror::Error;
use tracing::{debug, trace};

use crate::config::Rules;
use crate::error::BoardError;
use crate::game::invariants::check_invariants;
use crate::game::{NodeId, PlayerId, Roster, Session};
use crate::topology::{Topology, TopologyError, generate};

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform index in `[0, len)`.
    #[allow(clippy::cast_possible_truncation)]
    fn below(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }
}

/// Soak run settings.
#[derive(Debug, Clone, Copy)]
pub struct SoakConfig {
    /// Moves played before the playout is called a draw.
    pub max_moves: u32,
    /// Rules in force.
    pub rules: Rules,
    /// Undo and replay every move.
    pub check_undo: bool,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            max_moves: 10_000,
            rules: Rules::default(),
            check_undo: true,
        }
    }
}

/// What happened in one playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoakResult {
    /// Seed the playout ran with.
    pub seed: u64,
    /// Winner, or `None` if the move limit was reached first.
    pub winner: Option<PlayerId>,
    /// Moves played.
    pub moves: u32,
    /// Firings across all moves.
    pub firings: u64,
    /// Moves where the overflow guard tripped.
    pub overflows: u32,
    /// Most firings in a single move.
    pub longest_cascade: u32,
    /// Most snapshots held at once.
    pub deepest_history: usize,
}

/// Error from a soak run.
#[derive(Debug, Error)]
pub enum SoakError {
    /// The board could not be generated.
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// The generated board was rejected.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The player count is out of range.
    #[error("cannot seat {0} players")]
    Players(usize),
    /// The engine broke a rule.
    #[error("seed {seed}, move {moves}: {message}")]
    Violation {
        /// Seed of the failing playout.
        seed: u64,
        /// Moves played before the failure.
        moves: u32,
        /// What went wrong.
        message: String,
    },
}

/// Play one randomized game and check the engine after every move.
///
/// # Errors
///
/// Returns an error if the setup is invalid or any check fails.
pub fn run_soak(
    seed: u64,
    topology: Topology,
    players: usize,
    config: &SoakConfig,
) -> Result<SoakResult, SoakError> {
    let board = generate(topology)?;
    let roster = Roster::with_players(players).ok_or(SoakError::Players(players))?;
    let mut session = Session::new(board, roster, config.rules)?;
    let mut rng = Rng::new(seed);

    let mut result = SoakResult {
        seed,
        winner: None,
        moves: 0,
        firings: 0,
        overflows: 0,
        longest_cascade: 0,
        deepest_history: 0,
    };
    let violation = |moves: u32, message: String| SoakError::Violation {
        seed,
        moves,
        message,
    };

    while result.moves < config.max_moves && !session.is_over() {
        let player = session.current_player();
        let legal: Vec<NodeId> = session
            .board()
            .iter()
            .filter(|(_, node)| node.owner().is_none_or(|owner| owner == player))
            .map(|(id, _)| id)
            .collect();
        let Some(&target) = legal.get(rng.below(legal.len())) else {
            return Err(violation(
                result.moves,
                format!("player {player} has no legal move"),
            ));
        };

        let before = session.position().clone();
        let tokens = session.board().total_tokens();

        let outcome = session
            .place(target)
            .map_err(|err| violation(result.moves, format!("legal move refused: {err}")))?;
        trace!(seed, node = %target, player, firings = outcome.firings, "soak move");

        if let Some(first) = check_invariants(session.board()).first() {
            return Err(violation(result.moves, first.to_string()));
        }
        if session.board().total_tokens() != tokens + 1 {
            return Err(violation(
                result.moves,
                format!(
                    "token count went from {tokens} to {}",
                    session.board().total_tokens()
                ),
            ));
        }

        if config.check_undo {
            let after = session.position().clone();
            session
                .undo()
                .map_err(|err| violation(result.moves, err.to_string()))?;
            if session.position() != &before {
                return Err(violation(
                    result.moves,
                    "undo did not restore the position".to_string(),
                ));
            }
            let replay = session
                .place(target)
                .map_err(|err| violation(result.moves, format!("replay refused: {err}")))?;
            if replay != outcome || session.position() != &after {
                return Err(violation(
                    result.moves,
                    "replaying a move gave a different result".to_string(),
                ));
            }
        }

        // Moves are only ever taken back right after they are played
        result.deepest_history = result.deepest_history.max(session.history_depth());
        session.keep_history(0);

        result.moves += 1;
        result.firings += u64::from(outcome.firings);
        result.longest_cascade = result.longest_cascade.max(outcome.firings);
        if outcome.overflowed {
            result.overflows += 1;
        }
    }

    result.winner = session.winner();
    debug!(
        seed,
        moves = result.moves,
        winner = ?result.winner,
        "soak playout finished"
    );
    Ok(result)
}
