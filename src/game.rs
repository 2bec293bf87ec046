//! Simulation core.
//!
//! Everything a match needs, with no dependency on any display:
//! - Lanes and field geometry, pointer mapping
//! - Unit catalog, live units, towers and the crystal
//! - Mana economy and the opponent policy
//! - Combat planning and the per-tick update
//! - Outcome tracking and progression

pub mod ai;
pub mod catalog;
pub mod combat;
mod economy;
pub mod effects;
pub mod input;
pub mod invariants;
pub mod lane;
mod outcome;
mod snapshot;
mod state;
pub mod structures;
mod unit;

pub use ai::{Decision, OpponentPolicy};
pub use catalog::{Archetype, Capabilities, CATALOG};
pub use economy::Economy;
pub use effects::{Effects, FloatingText, HitTarget, Particle, SimEvent};
pub use input::{Layout, Tap, Viewport};
pub use lane::{Lane, LaneId, LANES, LANE_COUNT};
pub use outcome::{Outcome, OutcomeTracker, Progression};
pub use snapshot::{CrystalView, Snapshot, TowerView, UnitView};
pub use state::MatchState;
pub use structures::{Crystal, ObjectiveMode, Tower};
pub use unit::{Team, Unit, UnitId};
