//! Play command implementation.

use super::output::{format_move, format_status, render_board};
use super::{BoardArgs, CliError};
use splode::{Config, NodeId, Session};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  <id> | place <id>   drop a token on a node
  undo                take back the last move
  show                print the board
  help                print this help
  quit                leave the game
";

/// A line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Place(NodeId),
    Undo,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one line. Blank lines parse as `Show`.
    fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let command = match (words.next(), words.next()) {
            (None, _) | (Some("show" | "s"), None) => Self::Show,
            (Some("undo" | "u"), None) => Self::Undo,
            (Some("help" | "h" | "?"), None) => Self::Help,
            (Some("quit" | "q" | "exit"), None) => Self::Quit,
            (Some("place" | "p"), Some(id)) | (Some(id), None) => {
                let raw = id
                    .parse::<u32>()
                    .map_err(|_| format!("unknown command '{}'", line.trim()))?;
                Self::Place(NodeId::new(raw))
            }
            _ => return Err(format!("unknown command '{}'", line.trim())),
        };
        if words.next().is_some() {
            return Err(format!("unknown command '{}'", line.trim()));
        }
        Ok(command)
    }
}

/// Execute the play command on stdin and stdout.
///
/// # Errors
///
/// Returns an error if the game cannot be set up or the terminal fails.
pub(crate) fn execute(board: &BoardArgs, config: &Config) -> Result<(), CliError> {
    let session = board.session(config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    play(session, stdin.lock(), stdout.lock())
}

/// Run the command loop until `quit` or end of input.
fn play(mut session: Session, input: impl BufRead, mut out: impl Write) -> Result<(), CliError> {
    write!(out, "{}", render_board(&session))?;
    write!(out, "{}", format_status(&session))?;
    writeln!(out, "Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => write!(out, "{HELP}")?,
            Command::Show => {
                write!(out, "{}", render_board(&session))?;
                write!(out, "{}", format_status(&session))?;
            }
            Command::Undo => match session.undo() {
                Ok(()) => {
                    writeln!(out, "Move undone.")?;
                    write!(out, "{}", render_board(&session))?;
                    write!(out, "{}", format_status(&session))?;
                }
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Place(node) => {
                let player = session.current_player();
                match session.place(node) {
                    Ok(outcome) => {
                        writeln!(out, "{}", format_move(node, player, &outcome))?;
                        write!(out, "{}", render_board(&session))?;
                        write!(out, "{}", format_status(&session))?;
                    }
                    Err(e) => writeln!(out, "Illegal move: {e}")?,
                }
            }
        }
    }
    Ok(())
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
    fn test_parse_commands() {
        assert_eq!(Command::parse("3"), Ok(Command::Place(NodeId::new(3))));
        assert_eq!(Command::parse(" place 7 "), Ok(Command::Place(NodeId::new(7))));
        assert_eq!(Command::parse("undo"), Ok(Command::Undo));
        assert_eq!(Command::parse(""), Ok(Command::Show));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert!(Command::parse("place").is_err());
        assert!(Command::parse("place x").is_err());
        assert!(Command::parse("undo 2").is_err());
        assert!(Command::parse("fly").is_err());
    }

    #[test]
    fn test_play_loop() {
        let input = b"0\n0\nhelp\n9\nundo\nquit\n3\n";
        let mut out = Vec::new();
        play(session(), &input[..], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Player 1 -> node 0\n"));
        assert!(text.contains("Illegal move: node 0 is owned by player 1"));
        assert!(text.contains("Commands:"));
        assert!(text.contains("Illegal move: node 9 is not on the board"));
        assert!(text.contains("Move undone."));
        // Input after quit is ignored
        assert!(!text.contains("node 3"));
    }
}
