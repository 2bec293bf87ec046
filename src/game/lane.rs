//! Lanes and field geometry.
//!
//! The field is portrait: units travel along the y axis, lanes are fixed
//! columns at known x positions. All coordinates are logical units in a
//! 720 × 1280 canvas whose bottom 220 units are reserved for the card UI.

use serde::{Deserialize, Serialize};

/// Number of lanes on the field.
pub const LANE_COUNT: usize = 3;

/// Logical canvas width.
pub const LOGICAL_WIDTH: f32 = 720.0;

/// Logical canvas height, UI included.
pub const LOGICAL_HEIGHT: f32 = 1280.0;

/// Height of the card strip below the field.
pub const UI_HEIGHT: f32 = 220.0;

/// Height of the playable field.
pub const FIELD_HEIGHT: f32 = LOGICAL_HEIGHT - UI_HEIGHT;

/// A unit at or above this y has left the field.
pub const FIELD_MIN: f32 = 40.0;

/// A unit at or below this y has left the field.
pub const FIELD_MAX: f32 = FIELD_HEIGHT - 40.0;

/// The river crossing all lanes; the crystal sits on it.
pub const RIVER_Y: f32 = FIELD_HEIGHT * 0.5;

/// Archetype speeds are per frame at this rate.
pub const FRAME_RATE: f32 = 60.0;

/// Index of a lane, always in `0..LANE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneId(u8);

impl LaneId {
    /// The contested centre lane that holds the crystal.
    pub const CONTESTED: Self = Self(1);

    /// Create a lane id, or `None` if the index is out of range.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .filter(|&i| usize::from(i) < LANE_COUNT)
            .map(Self)
    }

    /// Zero-based lane index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The lane's static description.
    #[must_use]
    pub fn lane(self) -> &'static Lane {
        &LANES[self.index()]
    }

    /// Iterate over every lane id.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..LANE_COUNT).filter_map(Self::new)
    }
}

/// Per-lane multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneModifiers {
    /// Multiplier on movement speed.
    pub speed: f32,
    /// Multiplier on damage taken by units in the lane.
    pub damage_taken: f32,
}

impl LaneModifiers {
    /// No modification.
    pub const NEUTRAL: Self = Self {
        speed: 1.0,
        damage_taken: 1.0,
    };
}

/// A lane on the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    /// Column position.
    pub x: f32,
    /// Short label for UI.
    pub name: &'static str,
    /// Speed and damage modifiers.
    pub modifiers: LaneModifiers,
}

/// The three lanes, left to right.
pub const LANES: [Lane; LANE_COUNT] = [
    Lane {
        x: LOGICAL_WIDTH * 0.18,
        name: "left",
        modifiers: LaneModifiers::NEUTRAL,
    },
    Lane {
        x: LOGICAL_WIDTH * 0.5,
        name: "mid",
        // Faster but bloodier.
        modifiers: LaneModifiers {
            speed: 1.10,
            damage_taken: 1.15,
        },
    },
    Lane {
        x: LOGICAL_WIDTH * 0.82,
        name: "right",
        modifiers: LaneModifiers::NEUTRAL,
    },
];

/// Whether a y coordinate is inside the live part of the field.
#[must_use]
pub fn in_bounds(y: f32) -> bool {
    y > FIELD_MIN && y < FIELD_MAX
}
