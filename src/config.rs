//! Match tuning knobs.
//!
//! Every field has a default taken from the reference balance, so a config
//! file only needs the values it wants to change:
//!
//! ```json
//! { "objective": "zone_control", "mana_regen": 1.5 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::ObjectiveMode;

/// Tunable parameters for a match.
// Owned by one match and handed around by reference.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Mana each team starts (and restarts) with.
    pub mana_start: f32,
    /// Upper bound of each mana pool.
    pub mana_cap: f32,
    /// Base mana regenerated per second by both teams.
    pub mana_regen: f32,
    /// Starting health of every tower.
    pub tower_health: f32,
    /// Starting health of the crystal.
    pub crystal_health: f32,
    /// How the crystal rewards the teams.
    pub objective: ObjectiveMode,
    /// Mana granted per crystal hit (`HitBonus` mode).
    pub crystal_hit_bonus: f32,
    /// Units within this radius of the crystal count as present (`ZoneControl` mode).
    pub zone_radius: f32,
    /// Extra mana per second for a team that holds the zone.
    pub zone_regen_bonus: f32,
    /// Farthest distance at which a unit will engage the crystal.
    pub crystal_engage_distance: f32,
    /// How far behind a unit the crystal may be and still be engaged.
    pub crystal_behind_allowance: f32,
    /// Seconds before the opponent's first decision.
    pub ai_initial_delay: f32,
    /// Shortest re-arm delay of the opponent timer.
    pub ai_interval_min: f32,
    /// Longest re-arm delay of the opponent timer (exclusive).
    pub ai_interval_max: f32,
    /// Largest time step a single tick will simulate.
    pub max_dt: f32,
    /// Wins needed to gain a level.
    pub wins_per_level: u32,
    /// Highest arena tier reachable through levels.
    pub max_tier: u32,
    /// Let the opponent policy also play the player side.
    pub autopilot: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mana_start: 5.0,
            mana_cap: 10.0,
            mana_regen: 1.08,
            tower_health: 120.0,
            crystal_health: 150.0,
            objective: ObjectiveMode::HitBonus,
            crystal_hit_bonus: 2.0,
            zone_radius: 140.0,
            zone_regen_bonus: 0.6,
            crystal_engage_distance: 220.0,
            crystal_behind_allowance: 80.0,
            ai_initial_delay: 2.0,
            ai_interval_min: 1.0,
            ai_interval_max: 2.4,
            max_dt: 0.03,
            wins_per_level: 3,
            max_tier: 5,
            autopilot: false,
        }
    }
}

impl MatchConfig {
    /// Load a config from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds values rejected by [`MatchConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values describe a runnable match.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            }
        }

        let positive = |v: f32| v > 0.0;

        if !positive(self.mana_cap) {
            return Err(invalid("mana_cap", "must be positive"));
        }
        if !(0.0..=self.mana_cap).contains(&self.mana_start) {
            return Err(invalid("mana_start", "must lie within [0, mana_cap]"));
        }
        if self.mana_regen.is_nan() || self.mana_regen < 0.0 {
            return Err(invalid("mana_regen", "must not be negative"));
        }
        if !positive(self.tower_health) {
            return Err(invalid("tower_health", "must be positive"));
        }
        if !positive(self.crystal_health) {
            return Err(invalid("crystal_health", "must be positive"));
        }
        if !positive(self.ai_interval_min) {
            return Err(invalid("ai_interval_min", "must be positive"));
        }
        if !positive(self.ai_interval_max - self.ai_interval_min) {
            return Err(invalid("ai_interval_max", "must exceed ai_interval_min"));
        }
        if !positive(self.max_dt) {
            return Err(invalid("max_dt", "must be positive"));
        }
        if self.wins_per_level == 0 {
            return Err(invalid("wins_per_level", "must be at least 1"));
        }
        if self.max_tier == 0 {
            return Err(invalid("max_tier", "must be at least 1"));
        }
        Ok(())
    }
}
