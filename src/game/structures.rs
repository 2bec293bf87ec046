//! Towers and the contested crystal.
//!
//! Neither is ever removed from the field. Health floors at zero, after
//! which the structure is inert: it cannot be targeted and grants nothing.

use serde::{Deserialize, Serialize};

use crate::game::lane::RIVER_Y;
use crate::game::{LaneId, Team};

/// How the crystal rewards the teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    /// The crystal can be attacked; each hit grants the attacker mana.
    #[default]
    HitBonus,
    /// Units do not attack the crystal; holding its surroundings grants regen.
    ZoneControl,
    /// The crystal is decoration only.
    Disabled,
}

/// A defensive tower in a side lane.
// Live match state; an implicit copy would silently fork it.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq)]
pub struct Tower {
    /// Owning team.
    pub team: Team,
    /// Lane the tower guards.
    pub lane: LaneId,
    /// Position along the travel axis.
    pub y: f32,
    /// Current health.
    pub health: f32,
    /// Starting health.
    pub max_health: f32,
}

impl Tower {
    /// Build a full-health tower at its team's tower line.
    #[must_use]
    pub fn new(team: Team, lane: LaneId, max_health: f32) -> Self {
        Self {
            team,
            lane,
            y: team.tower_y(),
            health: max_health,
            max_health,
        }
    }

    /// Whether the tower still stands.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Subtract damage, flooring at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        before - self.health
    }

    /// Fraction of health remaining.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// The standard four towers: one per team in each side lane.
#[must_use]
pub fn standard_towers(max_health: f32) -> Vec<Tower> {
    let side_lanes: Vec<LaneId> = LaneId::all().filter(|&l| l != LaneId::CONTESTED).collect();
    Team::BOTH
        .iter()
        .flat_map(|&team| side_lanes.iter().map(move |&lane| Tower::new(team, lane, max_health)))
        .collect()
}

/// The crystal in the contested lane.
// Live match state; an implicit copy would silently fork it.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq)]
pub struct Crystal {
    /// Lane holding the crystal.
    pub lane: LaneId,
    /// Position along the travel axis.
    pub y: f32,
    /// Current health.
    pub health: f32,
    /// Starting health.
    pub max_health: f32,
    /// Team that landed the most recent hit.
    pub last_hit_by: Option<Team>,
    /// Visual pulse in `0..=1`, decays over time.
    pub pulse: f32,
}

/// Crystal pulse decay per second.
const PULSE_DECAY: f32 = 2.5;

impl Crystal {
    /// A fresh crystal on the river line of the contested lane.
    #[must_use]
    pub fn new(max_health: f32) -> Self {
        Self {
            lane: LaneId::CONTESTED,
            y: RIVER_Y,
            health: max_health,
            max_health,
            last_hit_by: None,
            pulse: 0.0,
        }
    }

    /// Whether the crystal still has health.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply a hit from `team`. Returns the damage actually taken.
    pub fn hit(&mut self, team: Team, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        self.last_hit_by = Some(team);
        self.pulse = 1.0;
        before - self.health
    }

    /// Let the pulse fade.
    pub fn decay(&mut self, dt: f32) {
        if self.pulse > 0.0 {
            self.pulse = (self.pulse - dt * PULSE_DECAY).max(0.0);
        }
    }

    /// Restore full health and forget the last hitter.
    pub fn reset(&mut self) {
        self.health = self.max_health;
        self.last_hit_by = None;
        self.pulse = 0.0;
    }

    /// Fraction of health remaining.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}
