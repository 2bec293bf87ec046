//! Read-only per-tick view of a match for renderers and tools.

use serde::Serialize;

use crate::game::{LaneId, MatchState, Outcome, Progression, SimEvent, Team, UnitId};

/// A live unit as the presentation layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitView {
    /// Spawn number.
    pub id: UnitId,
    /// Owner.
    pub team: Team,
    /// Lane.
    pub lane: LaneId,
    /// Archetype id.
    pub archetype: &'static str,
    /// Lane centre.
    pub x: f32,
    /// Position along the lane.
    pub y: f32,
    /// Health in `0..=1`.
    pub health_ratio: f32,
}

/// A tower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TowerView {
    /// Owner.
    pub team: Team,
    /// Lane.
    pub lane: LaneId,
    /// Lane centre.
    pub x: f32,
    /// Position along the lane.
    pub y: f32,
    /// Health in `0..=1`.
    pub health_ratio: f32,
}

/// The crystal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrystalView {
    /// Lane centre.
    pub x: f32,
    /// Position along the lane.
    pub y: f32,
    /// Current health.
    pub health: f32,
    /// Health in `0..=1`.
    pub health_ratio: f32,
    /// Team that hit it last.
    pub last_hit_by: Option<Team>,
    /// Visual pulse in `0..=1`.
    pub pulse: f32,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Simulated seconds.
    pub time: f32,
    /// Whether the match is running.
    pub playing: bool,
    /// Result once ended.
    pub outcome: Option<Outcome>,
    /// Player mana.
    pub player_mana: f32,
    /// Enemy mana.
    pub enemy_mana: f32,
    /// Pool cap shared by both teams.
    pub mana_cap: f32,
    /// Live units.
    pub units: Vec<UnitView>,
    /// All towers, destroyed ones included.
    pub towers: Vec<TowerView>,
    /// The crystal.
    pub crystal: CrystalView,
    /// Progression record.
    pub progression: Progression,
    /// Events of the last tick.
    pub events: Vec<SimEvent>,
}

impl Snapshot {
    /// Capture the current state of a match.
    #[must_use]
    pub fn capture(state: &MatchState) -> Self {
        let units = state
            .units
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| UnitView {
                id: u.id,
                team: u.team,
                lane: u.lane,
                archetype: u.archetype.id,
                x: u.lane.lane().x,
                y: u.y,
                health_ratio: u.health_ratio(),
            })
            .collect();
        let towers = state
            .towers
            .iter()
            .map(|t| TowerView {
                team: t.team,
                lane: t.lane,
                x: t.lane.lane().x,
                y: t.y,
                health_ratio: t.health_ratio(),
            })
            .collect();
        let c = &state.crystal;
        Self {
            time: state.time(),
            playing: state.is_playing(),
            outcome: state.outcome(),
            player_mana: state.economy.mana(Team::Player),
            enemy_mana: state.economy.mana(Team::Enemy),
            mana_cap: state.economy.cap(),
            units,
            towers,
            crystal: CrystalView {
                x: c.lane.lane().x,
                y: c.y,
                health: c.health,
                health_ratio: c.health_ratio(),
                last_hit_by: c.last_hit_by,
                pulse: c.pulse,
            },
            progression: state.progression(),
            events: state.events().to_vec(),
        }
    }

    /// Mana of one team.
    #[must_use]
    pub const fn mana(&self, team: Team) -> f32 {
        match team {
            Team::Player => self.player_mana,
            Team::Enemy => self.enemy_mana,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = MatchState::new(MatchConfig::default(), 5);
        state.deploy(Team::Player, "tank", 2).unwrap();
        let snap = state.snapshot();

        assert!(snap.playing);
        assert_eq!(snap.units.len(), 1);
        assert_eq!(snap.units[0].archetype, "tank");
        assert!((snap.units[0].health_ratio - 1.0).abs() < f32::EPSILON);
        assert_eq!(snap.towers.len(), 4);
        assert!((snap.mana(Team::Player) - 1.0).abs() < 1e-5);
        assert!((snap.mana_cap - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = MatchState::new(MatchConfig::default(), 5);
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["playing"], true);
        assert!(json["outcome"].is_null());
        assert_eq!(json["progression"]["level"], 1);
    }
}
