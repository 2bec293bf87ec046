//! Batch command implementation.

use super::output::{format_batch_csv, format_batch_text, JsonBatchResult};
use super::{load_config, resolve_seed, BatchFormat, CliError};
use indicatif::{ProgressBar, ProgressStyle};
use lanecrystal::batch::run_batch;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    config: Option<PathBuf>,
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    max_seconds: f32,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);
    info!(base_seed, games, "starting batch");

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
            .map_err(|e| CliError::new(format!("Bad progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_batch(base_seed, games, &config, max_seconds, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    });
    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.matches as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats));
            println!();
            println!("Duration: {:.2}s ({:.0} matches/sec)", duration.as_secs_f64(), games_per_sec);
        }
        BatchFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::from_stats(&stats, games_per_sec))?;
            println!("{json}");
        }
        BatchFormat::Csv => print!("{}", format_batch_csv(&stats)),
    }

    Ok(())
}
