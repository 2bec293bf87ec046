//! Teams and live unit instances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::lane::{FIELD_HEIGHT, FRAME_RATE};
use crate::game::{Archetype, LaneId};

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The human side, bottom of the field.
    #[serde(rename = "P")]
    Player,
    /// The AI side, top of the field.
    #[serde(rename = "E")]
    Enemy,
}

impl Team {
    /// Both teams, player first.
    pub const BOTH: [Self; 2] = [Self::Player, Self::Enemy];

    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }

    /// Sign of travel along the y axis.
    #[must_use]
    pub const fn direction(self) -> f32 {
        match self {
            Self::Player => -1.0,
            Self::Enemy => 1.0,
        }
    }

    /// Where this team's units appear.
    #[must_use]
    pub const fn spawn_y(self) -> f32 {
        match self {
            Self::Player => FIELD_HEIGHT - 140.0,
            Self::Enemy => 140.0,
        }
    }

    /// Where this team's towers stand.
    #[must_use]
    pub const fn tower_y(self) -> f32 {
        match self {
            Self::Player => FIELD_HEIGHT - 90.0,
            Self::Enemy => 90.0,
        }
    }

    /// Array slot for per-team storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Player => 0,
            Self::Enemy => 1,
        }
    }

    /// One-letter tag used in snapshots and logs.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Player => "P",
            Self::Enemy => "E",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Enemy => write!(f, "enemy"),
        }
    }
}

/// Monotonic spawn number; also the tie-breaker for equal distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u64);

/// A unit on the field.
///
/// Stats live on the shared [`Archetype`]; only what changes per tick is
/// stored here.
// Live match state; an implicit copy would silently fork it.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone)]
pub struct Unit {
    /// Spawn number.
    pub id: UnitId,
    /// Owning team.
    pub team: Team,
    /// Lane the unit walks in.
    pub lane: LaneId,
    /// Position along the travel axis.
    pub y: f32,
    /// Current health, `0..=archetype.health`.
    pub health: f32,
    /// Seconds until the next attack is allowed.
    pub cooldown: f32,
    /// Shared stat block.
    pub archetype: &'static Archetype,
}

impl Unit {
    /// Create a fresh unit at its team's spawn line.
    #[must_use]
    pub fn spawn(id: UnitId, team: Team, lane: LaneId, archetype: &'static Archetype) -> Self {
        Self {
            id,
            team,
            lane,
            y: team.spawn_y(),
            health: archetype.health,
            cooldown: 0.0,
            archetype,
        }
    }

    /// Whether the unit still has health left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Signed distance to `y` along this unit's direction; positive is ahead.
    #[must_use]
    pub fn ahead_distance(&self, y: f32) -> f32 {
        (y - self.y) * self.team.direction()
    }

    /// Lane-adjusted speed in logical units per second.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.archetype.speed * self.lane.lane().modifiers.speed * FRAME_RATE
    }

    /// Fraction of health remaining.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        (self.health / self.archetype.health).clamp(0.0, 1.0)
    }

    /// Whether healing would have any effect.
    #[must_use]
    pub fn is_wounded(&self) -> bool {
        self.health < self.archetype.health
    }
}
