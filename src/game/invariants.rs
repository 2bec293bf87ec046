//! Match invariants - sanity checks that detect bugs.
//!
//! Every transition in [`MatchState`] is supposed to keep these true, so a
//! violation always points at a bug in the simulation, never at bad input.

use crate::game::lane::in_bounds;
use crate::game::{MatchState, Outcome, Team};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all match invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &MatchState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let cap = state.economy.cap();

    for team in Team::BOTH {
        let mana = state.economy.mana(team);
        if !(0.0..=cap).contains(&mana) {
            violations.push(violation(format!("{team} mana {mana} outside [0, {cap}]")));
        }
    }

    for tower in &state.towers {
        if !(0.0..=tower.max_health).contains(&tower.health) {
            violations.push(violation(format!(
                "{} tower in lane {} has health {} outside [0, {}]",
                tower.team,
                tower.lane.index(),
                tower.health,
                tower.max_health
            )));
        }
    }

    let crystal = &state.crystal;
    if !(0.0..=crystal.max_health).contains(&crystal.health) {
        violations.push(violation(format!(
            "crystal health {} outside [0, {}]",
            crystal.health, crystal.max_health
        )));
    }

    for unit in &state.units {
        if !unit.is_alive() {
            violations.push(violation(format!("dead unit {} still live", unit.id.0)));
        }
        if !in_bounds(unit.y) {
            violations.push(violation(format!(
                "unit {} at y {} is off the field",
                unit.id.0, unit.y
            )));
        }
        if unit.health > unit.archetype.health {
            violations.push(violation(format!(
                "unit {} health {} above max {}",
                unit.id.0, unit.health, unit.archetype.health
            )));
        }
        if !(0.0..=unit.archetype.attack_interval).contains(&unit.cooldown) {
            violations.push(violation(format!(
                "unit {} cooldown {} outside [0, {}]",
                unit.id.0, unit.cooldown, unit.archetype.attack_interval
            )));
        }
    }

    // Spawn order is preserved by removal.
    if state.units.windows(2).any(|w| w[0].id >= w[1].id) {
        violations.push(violation("unit ids not strictly increasing".to_owned()));
    }

    let player = state.alive_towers(Team::Player);
    let enemy = state.alive_towers(Team::Enemy);
    match state.outcome() {
        None => {
            if player == 0 || enemy == 0 {
                violations.push(violation(format!(
                    "still playing with {player} player and {enemy} enemy towers"
                )));
            }
        }
        Some(outcome) => {
            if Outcome::from_towers(player, enemy) != Some(outcome) {
                violations.push(violation(format!(
                    "outcome {outcome} does not match towers {player}/{enemy}"
                )));
            }
        }
    }

    violations
}

/// Assert all match invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &MatchState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Match invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &MatchState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;

    fn fresh() -> MatchState {
        let mut state = MatchState::new(MatchConfig::default(), 11);
        state.deploy(Team::Player, "scout", 0).unwrap();
        state
    }

    #[test]
    fn test_fresh_match_passes() {
        assert!(check_invariants(&fresh()).is_empty());
    }

    #[test]
    fn test_long_match_keeps_invariants() {
        let config = MatchConfig {
            autopilot: true,
            ..MatchConfig::default()
        };
        let mut state = MatchState::new(config, 99);
        for _ in 0..(60 * 120) {
            state.tick(1.0 / 60.0);
            let violations = check_invariants(&state);
            assert!(violations.is_empty(), "{violations:?}");
        }
    }

    #[test]
    fn test_tower_overheal_detected() {
        let mut state = fresh();
        state.towers[0].health = state.towers[0].max_health + 1.0;
        let violations = check_invariants(&state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("tower"));
    }

    #[test]
    fn test_off_field_unit_detected() {
        let mut state = fresh();
        state.units[0].y = 5.0;
        let violations = check_invariants(&state);
        assert!(violations.iter().any(|v| v.message.contains("off the field")));
    }

    #[test]
    fn test_playing_without_towers_detected() {
        let mut state = fresh();
        for tower in state.towers.iter_mut().filter(|t| t.team == Team::Enemy) {
            tower.health = 0.0;
        }
        let violations = check_invariants(&state);
        assert!(violations.iter().any(|v| v.message.contains("still playing")));

        // One tick later the match has ended and agrees with the towers.
        state.tick(0.01);
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut state = fresh();
        state.units[0].health = 999.0;
        state.crystal.health = -1.0;
        let violations = check_invariants(&state);
        assert!(violations.len() >= 2, "{violations:?}");
    }

    #[test]
    #[should_panic(expected = "invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_panics_in_debug() {
        let mut state = fresh();
        state.crystal.health = -1.0;
        assert_invariants(&state);
    }
}
