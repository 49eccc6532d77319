//! Splode CLI - play, script and soak-test chain-reaction games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use splode::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Splode - chain-reaction territory capture on graphs
#[derive(Parser, Debug)]
#[command(name = "splode")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON config file with default rules, players and board
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an interactive game on the terminal
    Play {
        #[command(flatten)]
        board: cli::BoardArgs,
    },

    /// Play a scripted list of moves and report the result
    Run {
        #[command(flatten)]
        board: cli::BoardArgs,

        /// Node ids to play in order, one per turn
        #[arg(short, long, value_delimiter = ',', required = true)]
        moves: Vec<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run randomized playouts in parallel and check the engine after every move
    Soak {
        #[command(flatten)]
        board: cli::BoardArgs,

        /// Number of playouts (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each playout)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Moves per playout before calling it a draw (default: 10000)
        #[arg(long)]
        max_moves: Option<u32>,

        /// Skip the undo and replay check
        #[arg(long)]
        no_undo: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "splode=warn",
        1 => "splode=debug",
        _ => "splode=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match args.config.as_deref().map(Config::from_file) {
        None => Ok(Config::default()),
        Some(loaded) => loaded.map_err(cli::CliError::from),
    };

    let result = config.and_then(|config| match args.command {
        Commands::Play { board } => cli::play::execute(&board, &config),

        Commands::Run {
            board,
            moves,
            format,
        } => cli::run::execute(&board, &config, &moves, format),

        Commands::Soak {
            board,
            games,
            seed,
            threads,
            max_moves,
            no_undo,
            format,
            progress,
        } => cli::soak::execute(
            &board,
            &config,
            &cli::soak::SoakArgs {
                games,
                seed,
                threads,
                max_moves,
                check_undo: !no_undo,
                format,
                progress,
            },
        ),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
