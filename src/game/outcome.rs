//! Match end detection and the persisted win progression.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of a finished match, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every enemy tower fell while a player tower stood.
    Victory,
    /// Every player tower fell while an enemy tower stood.
    Defeat,
    /// Both sides lost their last tower in the same tick.
    Draw,
}

impl Outcome {
    /// Decide the outcome from alive tower counts, if the match is over.
    #[must_use]
    pub const fn from_towers(player_alive: usize, enemy_alive: usize) -> Option<Self> {
        match (player_alive, enemy_alive) {
            (0, 0) => Some(Self::Draw),
            (_, 0) => Some(Self::Victory),
            (0, _) => Some(Self::Defeat),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory => write!(f, "victory"),
            Self::Defeat => write!(f, "defeat"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Win counter, level and tier kept across matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progression {
    /// Total player victories.
    pub wins: u32,
    /// Level, starting at 1.
    pub level: u32,
    /// Level capped at the maximum tier.
    pub tier: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            wins: 0,
            level: 1,
            tier: 1,
        }
    }
}

impl Progression {
    /// Count a victory. Returns `true` if it raised the level.
    pub fn record_win(&mut self, wins_per_level: u32, max_tier: u32) -> bool {
        self.wins = self.wins.saturating_add(1);
        let levelled = wins_per_level > 0 && self.wins % wins_per_level == 0;
        if levelled {
            self.level = self.level.saturating_add(1);
        }
        self.tier = self.level.min(max_tier.max(1));
        levelled
    }
}

/// One-way `playing -> ended` state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutcomeTracker {
    outcome: Option<Outcome>,
}

impl OutcomeTracker {
    /// Fresh tracker in the playing state.
    #[must_use]
    pub const fn new() -> Self {
        Self { outcome: None }
    }

    /// Whether the match is still running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.outcome.is_none()
    }

    /// The final result, once decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Inspect tower counts after a tick.
    ///
    /// Returns the outcome only on the tick the match ends; every later call
    /// returns `None`.
    pub fn observe(&mut self, player_alive: usize, enemy_alive: usize) -> Option<Outcome> {
        if self.outcome.is_some() {
            return None;
        }
        self.outcome = Outcome::from_towers(player_alive, enemy_alive);
        self.outcome
    }

    /// Back to playing.
    pub fn reset(&mut self) {
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_towers() {
        assert_eq!(Outcome::from_towers(2, 2), None);
        assert_eq!(Outcome::from_towers(1, 0), Some(Outcome::Victory));
        assert_eq!(Outcome::from_towers(0, 2), Some(Outcome::Defeat));
        assert_eq!(Outcome::from_towers(0, 0), Some(Outcome::Draw));
    }

    #[test]
    fn test_tracker_fires_once() {
        let mut tracker = OutcomeTracker::new();
        assert!(tracker.is_playing());
        assert_eq!(tracker.observe(2, 1), None);
        assert_eq!(tracker.observe(2, 0), Some(Outcome::Victory));
        assert!(!tracker.is_playing());
        // Later states never change the result.
        assert_eq!(tracker.observe(0, 0), None);
        assert_eq!(tracker.outcome(), Some(Outcome::Victory));

        tracker.reset();
        assert!(tracker.is_playing());
    }

    #[test]
    fn test_progression_levels_every_third_win() {
        let mut p = Progression::default();
        assert!(!p.record_win(3, 5));
        assert!(!p.record_win(3, 5));
        assert!(p.record_win(3, 5));
        assert_eq!(p, Progression { wins: 3, level: 2, tier: 2 });
    }

    #[test]
    fn test_tier_caps() {
        let mut p = Progression::default();
        for _ in 0..30 {
            p.record_win(3, 5);
        }
        assert_eq!(p.level, 11);
        assert_eq!(p.tier, 5);
    }

    #[test]
    fn test_progression_partial_json() {
        let p: Progression = serde_json::from_str(r#"{"wins": 4}"#).unwrap();
        assert_eq!(p, Progression { wins: 4, level: 1, tier: 1 });
    }
}
