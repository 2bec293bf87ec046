//! Headless matches: autopilot against the opponent policy.
//!
//! Matches are independent, so a batch runs them with rayon using a
//! per-thread fold and a final reduce; no shared state is touched in the
//! hot path.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::MatchConfig;
use crate::game::{HitTarget, MatchState, Outcome, SimEvent, Team};

/// Fixed simulation step for headless runs.
pub const STEP: f32 = 1.0 / 60.0;

/// What happened in one headless match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchSummary {
    /// RNG seed of the match.
    pub seed: u64,
    /// Result, `None` if the time limit ran out first.
    pub outcome: Option<Outcome>,
    /// Simulated seconds.
    pub duration: f32,
    /// Units deployed per team, player first.
    pub deploys: [u32; 2],
    /// Damage dealt to towers per attacking team.
    pub tower_damage: [f32; 2],
    /// Crystal hits per team.
    pub crystal_hits: [u32; 2],
    /// Standing towers per team at the end.
    pub towers_left: [usize; 2],
}

/// Play one autopilot match at a fixed step.
#[must_use]
pub fn run_match(seed: u64, config: &MatchConfig, max_seconds: f32) -> MatchSummary {
    let config = MatchConfig {
        autopilot: true,
        ..config.clone()
    };
    let mut state = MatchState::new(config, seed);
    let mut deploys = [0u32; 2];
    let mut tower_damage = [0.0f32; 2];
    let mut crystal_hits = [0u32; 2];

    while state.is_playing() && state.time() < max_seconds {
        for event in state.tick(STEP) {
            match *event {
                SimEvent::Spawned { team, .. } => deploys[team.index()] += 1,
                SimEvent::Hit {
                    team,
                    target: HitTarget::Tower { .. },
                    amount,
                    ..
                } => tower_damage[team.index()] += amount,
                SimEvent::Hit {
                    team,
                    target: HitTarget::Crystal,
                    ..
                } => crystal_hits[team.index()] += 1,
                _ => {}
            }
        }
    }

    MatchSummary {
        seed,
        outcome: state.outcome(),
        duration: state.time(),
        deploys,
        tower_damage,
        crystal_hits,
        towers_left: [
            state.alive_towers(Team::Player),
            state.alive_towers(Team::Enemy),
        ],
    }
}

/// Aggregate over many matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchStats {
    /// Matches played.
    pub matches: u64,
    /// Player victories.
    pub victories: u64,
    /// Player defeats.
    pub defeats: u64,
    /// Draws.
    pub draws: u64,
    /// Matches cut off by the time limit.
    pub timeouts: u64,
    /// Sum of simulated seconds.
    pub total_duration: f64,
    /// Units deployed per team.
    pub deploys: [u64; 2],
    /// Crystal hits per team.
    pub crystal_hits: [u64; 2],
}

impl BatchStats {
    /// Fold one match in.
    pub fn add(&mut self, summary: &MatchSummary) {
        self.matches += 1;
        match summary.outcome {
            Some(Outcome::Victory) => self.victories += 1,
            Some(Outcome::Defeat) => self.defeats += 1,
            Some(Outcome::Draw) => self.draws += 1,
            None => self.timeouts += 1,
        }
        self.total_duration += f64::from(summary.duration);
        for i in 0..2 {
            self.deploys[i] += u64::from(summary.deploys[i]);
            self.crystal_hits[i] += u64::from(summary.crystal_hits[i]);
        }
    }

    /// Combine with stats from another thread.
    pub fn merge(&mut self, other: &Self) {
        self.matches += other.matches;
        self.victories += other.victories;
        self.defeats += other.defeats;
        self.draws += other.draws;
        self.timeouts += other.timeouts;
        self.total_duration += other.total_duration;
        for i in 0..2 {
            self.deploys[i] += other.deploys[i];
            self.crystal_hits[i] += other.crystal_hits[i];
        }
    }

    /// Fraction of matches the player won.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.victories as f64 / self.matches as f64
        }
    }

    /// Mean simulated match length in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_duration(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.total_duration / self.matches as f64
        }
    }
}

/// Run `games` matches with seeds `base_seed..base_seed + games` in parallel.
///
/// `on_match` is called once per finished match from worker threads.
pub fn run_batch<F>(
    base_seed: u64,
    games: u64,
    config: &MatchConfig,
    max_seconds: f32,
    on_match: F,
) -> BatchStats
where
    F: Fn(&MatchSummary) + Sync,
{
    (0..games)
        .into_par_iter()
        .fold(BatchStats::default, |mut stats, i| {
            let summary = run_match(base_seed.wrapping_add(i), config, max_seconds);
            on_match(&summary);
            stats.add(&summary);
            stats
        })
        .reduce(BatchStats::default, |mut a, b| {
            a.merge(&b);
            a
        })
}
