//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use lanecrystal::batch::{BatchStats, MatchSummary};
use serde::Serialize;

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult<'a> {
    /// Raw counters.
    pub(super) stats: &'a BatchStats,
    /// Player win rate.
    pub(super) win_rate: f64,
    /// Mean simulated seconds per match.
    pub(super) mean_duration: f64,
    /// Wall-clock throughput.
    pub(super) games_per_sec: f64,
}

impl<'a> JsonBatchResult<'a> {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &'a BatchStats, games_per_sec: f64) -> Self {
        Self {
            stats,
            win_rate: stats.win_rate(),
            mean_duration: stats.mean_duration(),
            games_per_sec,
        }
    }
}

fn outcome_label(summary: &MatchSummary) -> String {
    summary
        .outcome
        .map_or_else(|| "timeout".to_string(), |o| o.to_string())
}

/// Format a single match as human-readable text.
pub(super) fn format_summary_text(summary: &MatchSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Match Result (seed: {})", summary.seed);
    let _ = writeln!(output, "  Outcome: {}", outcome_label(summary));
    let _ = writeln!(output, "  Duration: {:.1}s", summary.duration);
    let _ = writeln!(
        output,
        "  Towers left: player {} / enemy {}",
        summary.towers_left[0], summary.towers_left[1]
    );
    let _ = writeln!(
        output,
        "  Deploys: player {} / enemy {}",
        summary.deploys[0], summary.deploys[1]
    );
    let _ = writeln!(
        output,
        "  Tower damage: player {:.0} / enemy {:.0}",
        summary.tower_damage[0], summary.tower_damage[1]
    );
    let _ = writeln!(
        output,
        "  Crystal hits: player {} / enemy {}",
        summary.crystal_hits[0], summary.crystal_hits[1]
    );
    output
}

/// Format batch stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();
    let pct = |n: u64| {
        if stats.matches == 0 {
            0.0
        } else {
            n as f64 * 100.0 / stats.matches as f64
        }
    };
    let _ = writeln!(output, "Batch Results ({} matches)", stats.matches);
    let _ = writeln!(output, "  Victories: {:>6} ({:5.1}%)", stats.victories, pct(stats.victories));
    let _ = writeln!(output, "  Defeats:   {:>6} ({:5.1}%)", stats.defeats, pct(stats.defeats));
    let _ = writeln!(output, "  Draws:     {:>6} ({:5.1}%)", stats.draws, pct(stats.draws));
    let _ = writeln!(output, "  Timeouts:  {:>6} ({:5.1}%)", stats.timeouts, pct(stats.timeouts));
    let _ = writeln!(output, "  Mean duration: {:.1}s", stats.mean_duration());
    let _ = writeln!(
        output,
        "  Deploys: player {} / enemy {}",
        stats.deploys[0], stats.deploys[1]
    );
    let _ = writeln!(
        output,
        "  Crystal hits: player {} / enemy {}",
        stats.crystal_hits[0], stats.crystal_hits[1]
    );
    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats) -> String {
    let mut output = String::from(
        "matches,victories,defeats,draws,timeouts,win_rate,mean_duration,\
         player_deploys,enemy_deploys,player_crystal_hits,enemy_crystal_hits\n",
    );
    let _ = writeln!(
        output,
        "{},{},{},{},{},{:.4},{:.2},{},{},{},{}",
        stats.matches,
        stats.victories,
        stats.defeats,
        stats.draws,
        stats.timeouts,
        stats.win_rate(),
        stats.mean_duration(),
        stats.deploys[0],
        stats.deploys[1],
        stats.crystal_hits[0],
        stats.crystal_hits[1],
    );
    output
}
