//! Sim command implementation - one headless autopilot match.

use super::output::format_summary_text;
use super::{load_config, resolve_seed, CliError, SimFormat};
use lanecrystal::batch::{run_match, STEP};
use lanecrystal::{render, MatchConfig, MatchState};
use std::path::PathBuf;
use tracing::info;

/// Execute the sim command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
pub(crate) fn execute(
    config: Option<PathBuf>,
    seed: Option<u64>,
    max_seconds: f32,
    frames: f32,
    format: SimFormat,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let seed = resolve_seed(seed);
    info!(seed, "starting headless match");

    if frames > 0.0 && format == SimFormat::Text {
        print_frames(seed, &config, max_seconds, frames);
    }

    let summary = run_match(seed, &config, max_seconds);
    match format {
        SimFormat::Text => print!("{}", format_summary_text(&summary)),
        SimFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

/// Replay the same match and dump the board at a fixed interval.
fn print_frames(seed: u64, config: &MatchConfig, max_seconds: f32, every: f32) {
    let config = MatchConfig {
        autopilot: true,
        ..config.clone()
    };
    let mut state = MatchState::new(config, seed);
    let mut next = 0.0;
    loop {
        if state.time() >= next || !state.is_playing() {
            let snapshot = state.snapshot();
            println!("{}", render::status_line(&snapshot));
            for line in render::board(&snapshot, 24) {
                println!("{line}");
            }
            println!();
            next += every;
        }
        if !state.is_playing() || state.time() >= max_seconds {
            break;
        }
        state.tick(STEP);
    }
}
