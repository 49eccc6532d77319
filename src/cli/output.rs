//! Output formatting utilities for CLI.

use serde::Serialize;
use splode::soak::SoakResult;
use splode::topology::{Bounds, bounds};
use splode::{MoveOutcome, NodeId, PlayerId, Session, Topology};
use std::fmt::Write;

/// Format one node as `id[owner:count]`, with `-` for unclaimed.
fn format_cell(id: NodeId, owner: Option<PlayerId>, count: u32) -> String {
    let owner = owner.map_or_else(|| "-".to_string(), |p| p.to_string());
    format!("{id:>3}[{owner}:{count}]")
}

/// Render the board as text, one line per row of nodes.
///
/// Nodes sharing a vertical coordinate (rounded) share a line, ordered left
/// to right.
pub(super) fn render_board(session: &Session) -> String {
    let board = session.board();
    let mut nodes: Vec<_> = board
        .iter()
        .map(|(id, node)| {
            let p = node.placement();
            #[allow(clippy::cast_possible_truncation)]
            let key = (p.y.round() as i64, p.x.round() as i64);
            (key, id, node)
        })
        .collect();
    nodes.sort_by_key(|&(key, id, _)| (key, id));

    let mut output = String::new();
    let mut row: Option<i64> = None;
    for ((y, _), id, node) in nodes {
        if row.is_some_and(|r| r != y) {
            output.push('\n');
        }
        row = Some(y);
        output.push_str(&format_cell(id, node.owner(), node.count()));
    }
    output.push('\n');
    output
}

/// Tallies and whose turn it is.
pub(super) fn format_status(session: &Session) -> String {
    let board = session.board();
    let mut output = String::new();
    for player in session.roster().iter() {
        let _ = writeln!(
            output,
            "  Player {} ({}): {} of {} nodes",
            player.id,
            player.name,
            board.tally_for(player.id),
            board.total_nodes()
        );
    }
    match session.winner() {
        Some(winner) => {
            let _ = writeln!(output, "  Winner: Player {winner}");
        }
        None => {
            let _ = writeln!(output, "  To move: Player {}", session.current_player());
        }
    }
    output
}

/// One line describing a settled move.
pub(super) fn format_move(node: NodeId, player: PlayerId, outcome: &MoveOutcome) -> String {
    let mut line = format!("Player {player} -> node {node}");
    if outcome.fired() {
        let _ = write!(line, ": {} firings", outcome.firings);
    }
    if outcome.overflowed {
        line.push_str(" (cascade overflow, rest dropped)");
    }
    if let Some(winner) = outcome.winner {
        let _ = write!(line, " - Player {winner} wins");
    }
    line
}

/// JSON-serializable node.
#[derive(Debug, Serialize)]
pub(super) struct JsonNode {
    /// Node id.
    id: u32,
    /// Owner (null if unclaimed).
    owner: Option<PlayerId>,
    /// Tokens held.
    count: u32,
    /// Board-space centre.
    x: f64,
    /// Board-space centre.
    y: f64,
    /// Drawn radius.
    radius: f64,
    /// Adjacent node ids.
    neighbors: Vec<u32>,
}

/// JSON-serializable move.
#[derive(Debug, Serialize)]
pub(super) struct JsonMove {
    /// Node played.
    node: u32,
    /// Player who played it.
    player: PlayerId,
    /// Nodes that fired.
    firings: u32,
    /// Worklist pops.
    steps: u32,
    /// Overflow guard tripped.
    overflowed: bool,
}

impl JsonMove {
    /// Create from a settled move.
    pub(super) fn new(node: NodeId, player: PlayerId, outcome: &MoveOutcome) -> Self {
        Self {
            node: node.raw(),
            player,
            firings: outcome.firings,
            steps: outcome.steps,
            overflowed: outcome.overflowed,
        }
    }
}

/// JSON-serializable result of a scripted game.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult {
    /// Board description.
    topology: String,
    /// Winner player ID (null if undecided).
    winner: Option<PlayerId>,
    /// Player to move next.
    to_move: PlayerId,
    /// Nodes owned per player, in seat order.
    tallies: Vec<u32>,
    /// Moves in the order played.
    moves: Vec<JsonMove>,
    /// Final board.
    nodes: Vec<JsonNode>,
    /// Padded bounding box of the board.
    bounds: Option<Bounds>,
}

impl JsonRunResult {
    /// Create from the final session and the moves that led to it.
    pub(super) fn new(topology: Topology, session: &Session, moves: Vec<JsonMove>) -> Self {
        let board = session.board();
        Self {
            topology: topology.to_string(),
            winner: session.winner(),
            to_move: session.current_player(),
            tallies: session
                .roster()
                .iter()
                .map(|p| board.tally_for(p.id))
                .collect(),
            moves,
            nodes: board
                .iter()
                .map(|(id, node)| {
                    let p = node.placement();
                    JsonNode {
                        id: id.raw(),
                        owner: node.owner(),
                        count: node.count(),
                        x: p.x,
                        y: p.y,
                        radius: p.radius,
                        neighbors: board.neighbors(id).iter().map(|n| n.raw()).collect(),
                    }
                })
                .collect(),
            bounds: bounds(board),
        }
    }
}

/// Soak statistics aggregated across playouts.
#[derive(Debug, Default)]
pub(super) struct SoakStats {
    /// Total playouts finished, failed ones included.
    pub(super) games_played: u64,
    /// Win count per player.
    pub(super) wins: Vec<u64>,
    /// Playouts that hit the move limit.
    pub(super) draws: u64,
    /// Total moves across all playouts.
    total_moves: u64,
    /// Total firings across all playouts.
    total_firings: u64,
    /// Moves where the overflow guard tripped.
    overflows: u64,
    /// Most firings in a single move.
    longest_cascade: u32,
    /// Failure messages, one per failed playout.
    pub(super) failures: Vec<String>,
}

impl SoakStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            ..Self::default()
        }
    }

    /// Add a finished playout.
    pub(super) fn add_result(&mut self, result: &SoakResult) {
        self.games_played += 1;
        self.total_moves += u64::from(result.moves);
        self.total_firings += result.firings;
        self.overflows += u64::from(result.overflows);
        self.longest_cascade = self.longest_cascade.max(result.longest_cascade);

        match result
            .winner
            .and_then(|w| usize::from(w).checked_sub(1))
            .and_then(|idx| self.wins.get_mut(idx))
        {
            Some(wins) => *wins += 1,
            None => self.draws += 1,
        }
    }

    /// Add a failed playout.
    pub(super) fn add_failure(&mut self, message: String) {
        self.games_played += 1;
        self.failures.push(message);
    }

    /// Fold another thread's stats into these.
    pub(super) fn merge(&mut self, other: Self) {
        self.games_played += other.games_played;
        for (mine, theirs) in self.wins.iter_mut().zip(&other.wins) {
            *mine += theirs;
        }
        self.draws += other.draws;
        self.total_moves += other.total_moves;
        self.total_firings += other.total_firings;
        self.overflows += other.overflows;
        self.longest_cascade = self.longest_cascade.max(other.longest_cascade);
        self.failures.extend(other.failures);
    }

    /// Get average playout length.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_moves(&self) -> f64 {
        let finished = self.games_played - self.failures.len() as u64;
        if finished == 0 {
            return 0.0;
        }
        self.total_moves as f64 / finished as f64
    }

    /// Get average firings per move.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn firings_per_move(&self) -> f64 {
        if self.total_moves == 0 {
            return 0.0;
        }
        self.total_firings as f64 / self.total_moves as f64
    }
}

/// JSON-serializable soak summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonSoakResult {
    /// Board description.
    topology: String,
    /// Total playouts.
    games_played: u64,
    /// Wins per player, in seat order.
    wins: Vec<u64>,
    /// Playouts that hit the move limit.
    draws: u64,
    /// Average playout length in moves.
    avg_moves: f64,
    /// Average firings per move.
    firings_per_move: f64,
    /// Most firings in a single move.
    longest_cascade: u32,
    /// Moves where the overflow guard tripped.
    overflows: u64,
    /// Failure messages.
    failures: Vec<String>,
}

impl JsonSoakResult {
    /// Create from stats.
    pub(super) fn from_stats(topology: Topology, stats: &SoakStats) -> Self {
        Self {
            topology: topology.to_string(),
            games_played: stats.games_played,
            wins: stats.wins.clone(),
            draws: stats.draws,
            avg_moves: stats.avg_moves(),
            firings_per_move: stats.firings_per_move(),
            longest_cascade: stats.longest_cascade,
            overflows: stats.overflows,
            failures: stats.failures.clone(),
        }
    }
}

/// Format soak stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_soak_text(topology: Topology, stats: &SoakStats) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Soak Results ({} playouts on {topology})",
        stats.games_played
    );
    output.push_str("========================================\n\n");

    output.push_str("Wins:\n");
    let games = stats.games_played.max(1) as f64;
    for (i, wins) in stats.wins.iter().enumerate() {
        let _ = writeln!(
            output,
            "  Player {}: {:.1}% ({wins} wins)",
            i + 1,
            *wins as f64 / games * 100.0
        );
    }
    let _ = writeln!(output, "  Move limit reached: {}\n", stats.draws);

    let _ = writeln!(output, "Average playout: {:.0} moves", stats.avg_moves());
    let _ = writeln!(output, "Firings per move: {:.2}", stats.firings_per_move());
    let _ = writeln!(output, "Longest cascade: {} firings", stats.longest_cascade);
    let _ = writeln!(output, "Overflow guard trips: {}", stats.overflows);

    if stats.failures.is_empty() {
        output.push_str("\nAll checks passed\n");
    } else {
        let _ = writeln!(output, "\nFailures ({}):", stats.failures.len());
        for failure in &stats.failures {
            let _ = writeln!(output, "  {failure}");
        }
    }

    output
}
