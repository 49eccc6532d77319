//! Soak command implementation.

use super::output::{JsonSoakResult, SoakStats, format_soak_text};
use super::{BoardArgs, CliError, OutputFormat};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use splode::Config;
use splode::soak::{SoakConfig, run_soak};
use std::time::Instant;

/// Flags of the soak command.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SoakArgs {
    /// Number of playouts.
    pub(crate) games: u64,
    /// Starting seed.
    pub(crate) seed: Option<u64>,
    /// Parallel threads.
    pub(crate) threads: Option<usize>,
    /// Move limit per playout.
    pub(crate) max_moves: Option<u32>,
    /// Undo and replay every move.
    pub(crate) check_undo: bool,
    /// Output format.
    pub(crate) format: OutputFormat,
    /// Show progress bar.
    pub(crate) progress: bool,
}

/// Execute the soak command.
///
/// # Errors
///
/// Returns an error if the setup is invalid or any playout fails a check.
pub(crate) fn execute(board: &BoardArgs, config: &Config, args: &SoakArgs) -> Result<(), CliError> {
    let topology = board.topology(config);
    let players = board.players(config);
    // Surface setup errors once instead of once per playout
    board.session(config)?;

    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Base seed
    let base_seed = args.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(42, |d| d.as_secs())
    });

    let mut soak_config = SoakConfig {
        rules: config.rules,
        check_undo: args.check_undo,
        ..SoakConfig::default()
    };
    if let Some(max_moves) = args.max_moves {
        soak_config.max_moves = max_moves;
    }

    // Progress bar
    let pb = if args.progress {
        let pb = ProgressBar::new(args.games);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} playouts ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("bad progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread accumulates into its own SoakStats, merged at the end
    let stats = (0..args.games)
        .into_par_iter()
        .fold(
            || SoakStats::new(players),
            |mut local, i| {
                let seed = base_seed.wrapping_add(i);
                match run_soak(seed, topology, players, &soak_config) {
                    Ok(result) => local.add_result(&result),
                    Err(e) => local.add_failure(e.to_string()),
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local
            },
        )
        .reduce(
            || SoakStats::new(players),
            |mut a, b| {
                a.merge(b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    // Output based on format
    match args.format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_soak_text(topology, &stats));
            println!();
            println!(
                "Seeds {base_seed}..{}, duration: {:.2}s ({per_sec:.0} playouts/sec)",
                base_seed.wrapping_add(args.games),
                duration.as_secs_f64()
            );
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSoakResult::from_stats(topology, &stats))?;
            println!("{json}");
        }
    }

    if stats.failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::new(format!(
            "{} of {} playouts failed",
            stats.failures.len(),
            stats.games_played
        )))
    }
}
