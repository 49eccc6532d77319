//! Run command implementation.

use super::output::{JsonMove, JsonRunResult, format_move, format_status, render_board};
use super::{BoardArgs, CliError, OutputFormat};
use splode::{Config, NodeId, Session};

/// Execute the run command.
///
/// Moves are played in order, one per turn. The first refused move aborts
/// the run.
///
/// # Errors
///
/// Returns an error if the game cannot be set up or a move is refused.
pub(crate) fn execute(
    board: &BoardArgs,
    config: &Config,
    moves: &[u32],
    format: OutputFormat,
) -> Result<(), CliError> {
    let topology = board.topology(config);
    let mut session = board.session(config)?;
    let (played, lines) = play_script(&mut session, moves)?;

    // Output based on format
    match format {
        OutputFormat::Text => {
            println!("Board: {topology}");
            for line in lines {
                println!("{line}");
            }
            println!();
            print!("{}", render_board(&session));
            print!("{}", format_status(&session));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonRunResult::new(
                topology, &session, played,
            ))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Play each move for whoever is to move, stopping early once the game is won.
fn play_script(
    session: &mut Session,
    moves: &[u32],
) -> Result<(Vec<JsonMove>, Vec<String>), CliError> {
    let mut played = Vec::with_capacity(moves.len());
    let mut lines = Vec::with_capacity(moves.len());

    for (turn, &raw) in moves.iter().enumerate() {
        if session.is_over() {
            lines.push(format!(
                "Game over after {turn} moves; {} moves ignored",
                moves.len() - turn
            ));
            break;
        }
        let node = NodeId::new(raw);
        let player = session.current_player();
        let outcome = session
            .place(node)
            .map_err(|e| CliError::new(format!("move {} (node {node}): {e}", turn + 1)))?;
        lines.push(format_move(node, player, &outcome));
        played.push(JsonMove::new(node, player, &outcome));
    }
    Ok((played, lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use splode::{Roster, Rules, Topology, generate};

    fn session() -> Session {
        let board = generate(Topology::Square { size: 2 }).unwrap();
        Session::new(board, Roster::with_players(2).unwrap(), Rules::default()).unwrap()
    }

    #[test]
    fn test_script_plays_alternating_turns() {
        let mut game = session();
        let (played, lines) = play_script(&mut game, &[0, 3, 0]).unwrap();
        assert_eq!(played.len(), 3);
        assert_eq!(lines[2], "Player 1 -> node 0: 1 firings");
        assert_eq!(game.board().tally_for(1), 3);
    }

    #[test]
    fn test_script_stops_after_win() {
        let mut game = session();
        let (played, lines) = play_script(&mut game, &[0, 3, 0, 3, 1, 2]).unwrap();
        assert_eq!(played.len(), 4);
        assert_eq!(lines.last().unwrap(), "Game over after 4 moves; 2 moves ignored");
    }

    #[test]
    fn test_script_reports_refused_move() {
        let mut game = session();
        let err = play_script(&mut game, &[0, 0]).unwrap_err();
        assert_eq!(err.to_string(), "move 2 (node 0): node 0 is owned by player 1");
    }
}
