//! CLI command implementations for Splode.

pub(crate) mod play;
pub(crate) mod run;
pub(crate) mod soak;

mod output;

use clap::{Args, ValueEnum};
use splode::{Config, Roster, Session, Topology, generate};
use std::error::Error;
use std::fmt;

/// Output format for the `run` and `soak` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Board shape selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Shape {
    /// Rectangular grid (`--size` columns, `--height` rows).
    Rect,
    /// Square grid.
    Square,
    /// Single row.
    Path,
    /// Ring.
    Cycle,
    /// Ring with a hub.
    Wheel,
    /// Every node joined to every other.
    Complete,
    /// Checkerboard lattice joined along the diagonals.
    Diamond,
}

/// Board size used when `--shape` is given without `--size`.
const DEFAULT_SIZE: usize = 5;

/// Board and roster flags shared by every command.
#[derive(Args, Debug, Clone)]
pub(crate) struct BoardArgs {
    /// Board shape (default: from config, else a 5x5 grid)
    #[arg(long)]
    shape: Option<Shape>,

    /// Board size, width for rect [default: 5]
    #[arg(long, requires = "shape")]
    size: Option<usize>,

    /// Rows for rect boards (default: same as --size)
    #[arg(long, requires = "shape")]
    height: Option<usize>,

    /// Number of players (default: from config)
    #[arg(long)]
    players: Option<usize>,

    /// Player names, comma separated; sets the number of players
    #[arg(long, value_delimiter = ',', conflicts_with = "players")]
    names: Vec<String>,
}

impl BoardArgs {
    /// Board chosen by the flags, falling back to the config.
    pub(crate) fn topology(&self, config: &Config) -> Topology {
        let size = self.size.unwrap_or(DEFAULT_SIZE);
        match self.shape {
            None => config.topology,
            Some(Shape::Rect) => Topology::Rect {
                width: size,
                height: self.height.unwrap_or(size),
            },
            Some(Shape::Square) => Topology::Square { size },
            Some(Shape::Path) => Topology::Path { size },
            Some(Shape::Cycle) => Topology::Cycle { size },
            Some(Shape::Wheel) => Topology::Wheel { size },
            Some(Shape::Complete) => Topology::Complete { size },
            Some(Shape::Diamond) => Topology::Diamond { size },
        }
    }

    /// Player count chosen by the flags, falling back to the config.
    pub(crate) fn players(&self, config: &Config) -> usize {
        if self.names.is_empty() {
            self.players.unwrap_or(config.players)
        } else {
            self.names.len()
        }
    }

    /// Seat the players, named by `--names` if given.
    pub(crate) fn roster(&self, config: &Config) -> Result<Roster, CliError> {
        let players = self.players(config);
        let roster = if self.names.is_empty() {
            Roster::with_players(players)
        } else {
            Roster::from_names(self.names.iter().map(String::as_str))
        };
        roster.ok_or_else(|| CliError::new(format!("cannot seat {players} players")))
    }

    /// Start a fresh game.
    pub(crate) fn session(&self, config: &Config) -> Result<Session, CliError> {
        let board = generate(self.topology(config))?;
        let roster = self.roster(config)?;
        Ok(Session::new(board, roster, config.rules)?)
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<splode::ConfigError> for CliError {
    fn from(e: splode::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<splode::TopologyError> for CliError {
    fn from(e: splode::TopologyError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<splode::BoardError> for CliError {
    fn from(e: splode::BoardError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
