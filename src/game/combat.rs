//! Per-unit decision making: targeting, ally spacing and attacks.
//!
//! Planning is read-only. Every unit is planned against the same
//! start-of-tick view of the field, and [`crate::game::MatchState`] applies
//! the plans afterwards, so the outcome of a tick never depends on the
//! order of the unit list. Equal distances always resolve to the lower
//! [`crate::game::UnitId`].

use crate::game::{Crystal, Tower, Unit};

/// Extra distance beyond the gap over which a blocking leader caps speed.
pub const BLOCKING_SLACK: f32 = 24.0;

/// Crystal targeting parameters for a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrystalRules {
    /// Whether units may attack the crystal at all.
    pub targetable: bool,
    /// Farthest engagement distance.
    pub engage_distance: f32,
    /// How far behind the unit the crystal may sit.
    pub behind_allowance: f32,
}

/// What a unit is aiming at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    /// A unit, by index into the unit slice.
    Unit(usize),
    /// A tower, by index into the tower slice.
    Tower(usize),
    /// The crystal.
    Crystal,
}

/// A chosen target and how far away it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// What is targeted.
    pub target: TargetRef,
    /// Distance along the lane.
    pub distance: f32,
}

/// The action a unit takes this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Strike the target for `amount` (before lane modifiers).
    Attack {
        /// What to hit.
        target: TargetRef,
        /// Raw damage.
        amount: f32,
    },
    /// Restore `amount` health to the ally at this index.
    Heal {
        /// Unit index of the ally.
        ally: usize,
        /// Health restored.
        amount: f32,
    },
    /// Engaged but waiting on cooldown, or otherwise standing still.
    Hold,
    /// Too close to the ally ahead to move.
    Blocked,
    /// Move forward by this many logical units.
    Advance(f32),
}

/// A unit's plan for the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plan {
    /// Index of the unit in the slice it was planned from.
    pub unit: usize,
    /// Cooldown after this tick.
    pub cooldown: f32,
    /// What the unit does.
    pub action: Action,
}

/// Strict "a is preferable to b" for `(distance, id)` candidates.
fn closer(distance: f32, id: u64, best: Option<(f32, u64)>) -> bool {
    match best {
        None => true,
        Some((d, i)) => distance < d || (distance <= d && id < i),
    }
}

/// Nearest enemy unit ahead in the same lane.
#[must_use]
pub fn nearest_enemy(units: &[Unit], me: usize) -> Option<Target> {
    let unit = &units[me];
    let mut best: Option<(f32, u64, usize)> = None;
    for (i, other) in units.iter().enumerate() {
        if other.team == unit.team || other.lane != unit.lane || !other.is_alive() {
            continue;
        }
        let d = unit.ahead_distance(other.y);
        if d <= 0.0 {
            continue;
        }
        if closer(d, other.id.0, best.map(|(bd, bi, _)| (bd, bi))) {
            best = Some((d, other.id.0, i));
        }
    }
    best.map(|(distance, _, i)| Target {
        target: TargetRef::Unit(i),
        distance,
    })
}

/// Whether `distance` strictly beats the current best.
fn nearer(best: Option<&Target>, distance: f32) -> bool {
    best.is_none_or(|b| distance < b.distance)
}

/// Pick the nearest target ahead: an enemy unit, the lane's enemy tower or
/// the crystal.
///
/// Equal distances go to a unit over a tower and to a tower over the
/// crystal. The crystal is only a candidate inside the engage cap.
#[must_use]
pub fn find_target(
    units: &[Unit],
    me: usize,
    towers: &[Tower],
    crystal: &Crystal,
    rules: CrystalRules,
) -> Option<Target> {
    let mut best = nearest_enemy(units, me);

    let unit = &units[me];
    let enemy = unit.team.opponent();

    let tower = towers
        .iter()
        .enumerate()
        .filter(|(_, t)| t.team == enemy && t.lane == unit.lane && t.is_alive())
        .map(|(i, t)| (i, unit.ahead_distance(t.y)))
        .filter(|&(_, d)| d > 0.0)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((i, distance)) = tower
        && nearer(best.as_ref(), distance)
    {
        best = Some(Target {
            target: TargetRef::Tower(i),
            distance,
        });
    }

    if rules.targetable && unit.lane == crystal.lane && crystal.is_alive() {
        let ahead = unit.ahead_distance(crystal.y);
        let distance = ahead.abs();
        if ahead >= -rules.behind_allowance
            && distance < rules.engage_distance
            && nearer(best.as_ref(), distance)
        {
            best = Some(Target {
                target: TargetRef::Crystal,
                distance,
            });
        }
    }

    best
}

/// Nearest same-team unit ahead in the lane, with its distance.
///
/// An ally standing on exactly the same spot counts as ahead when it was
/// spawned earlier, so stacked spawns queue up instead of merging.
#[must_use]
pub fn front_ally(units: &[Unit], me: usize) -> Option<(usize, f32)> {
    let unit = &units[me];
    let mut best: Option<(f32, u64, usize)> = None;
    for (i, other) in units.iter().enumerate() {
        if i == me || other.team != unit.team || other.lane != unit.lane || !other.is_alive() {
            continue;
        }
        let d = unit.ahead_distance(other.y);
        let ahead = d > 0.0 || (d.abs() <= f32::EPSILON && other.id < unit.id);
        if !ahead {
            continue;
        }
        let d = d.max(0.0);
        if closer(d, other.id.0, best.map(|(bd, bi, _)| (bd, bi))) {
            best = Some((d, other.id.0, i));
        }
    }
    best.map(|(d, _, i)| (i, d))
}

/// Nearest wounded ally in the lane within the unit's range.
#[must_use]
pub fn heal_target(units: &[Unit], me: usize) -> Option<usize> {
    let unit = &units[me];
    let mut best: Option<(f32, u64, usize)> = None;
    for (i, other) in units.iter().enumerate() {
        if i == me
            || other.team != unit.team
            || other.lane != unit.lane
            || !other.is_alive()
            || !other.is_wounded()
        {
            continue;
        }
        let d = (other.y - unit.y).abs();
        if d > unit.archetype.range {
            continue;
        }
        if closer(d, other.id.0, best.map(|(bd, bi, _)| (bd, bi))) {
            best = Some((d, other.id.0, i));
        }
    }
    best.map(|(_, _, i)| i)
}

/// How far a unit may move this tick given the ally in front.
///
/// Returns `None` when the unit is blocked outright.
#[must_use]
pub fn movement_step(units: &[Unit], me: usize, dt: f32) -> Option<f32> {
    let unit = &units[me];
    let mut step = unit.speed() * dt;

    if let Some((leader_idx, distance)) = front_ally(units, me) {
        let leader = &units[leader_idx];
        let gap = unit.archetype.min_gap.max(leader.archetype.min_gap);
        let allowance = distance - gap;
        if allowance <= 0.0 {
            return None;
        }
        step = step.min(allowance);
        if leader.archetype.capabilities.blocking && distance < gap + BLOCKING_SLACK {
            step = step.min(leader.speed() * dt);
        }
    }

    Some(step)
}

/// Decide what one unit does this tick.
#[must_use]
pub fn plan_unit(
    units: &[Unit],
    me: usize,
    towers: &[Tower],
    crystal: &Crystal,
    rules: CrystalRules,
    dt: f32,
) -> Plan {
    let unit = &units[me];
    let archetype = unit.archetype;
    let mut cooldown = (unit.cooldown - dt).max(0.0);
    let ready = cooldown <= 0.0;

    let action = if archetype.capabilities.support {
        let ally = heal_target(units, me);
        let threatened = nearest_enemy(units, me).is_some_and(|t| t.distance <= archetype.range);
        match ally {
            Some(ally) if ready => {
                cooldown = archetype.attack_interval;
                Action::Heal {
                    ally,
                    amount: archetype.damage,
                }
            }
            Some(_) => Action::Hold,
            None if threatened => Action::Hold,
            None => advance(units, me, dt),
        }
    } else {
        let target = find_target(units, me, towers, crystal, rules)
            .filter(|t| t.distance <= archetype.range);
        match target {
            Some(t) if ready => {
                cooldown = archetype.attack_interval;
                Action::Attack {
                    target: t.target,
                    amount: archetype.damage,
                }
            }
            Some(_) => Action::Hold,
            None => advance(units, me, dt),
        }
    };

    Plan {
        unit: me,
        cooldown,
        action,
    }
}

fn advance(units: &[Unit], me: usize, dt: f32) -> Action {
    movement_step(units, me, dt).map_or(Action::Blocked, Action::Advance)
}

/// Plan every live unit against the same view of the field.
#[must_use]
pub fn plan_all(
    units: &[Unit],
    towers: &[Tower],
    crystal: &Crystal,
    rules: CrystalRules,
    dt: f32,
) -> Vec<Plan> {
    (0..units.len())
        .filter(|&i| units[i].is_alive())
        .map(|i| plan_unit(units, i, towers, crystal, rules, dt))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{catalog, LaneId, Team, UnitId};

    const RULES: CrystalRules = CrystalRules {
        targetable: true,
        engage_distance: 220.0,
        behind_allowance: 80.0,
    };

    fn unit(id: u64, team: Team, lane: usize, kind: &str, y: f32) -> Unit {
        let mut u = Unit::spawn(
            UnitId(id),
            team,
            LaneId::new(lane).unwrap(),
            catalog::find(kind).unwrap(),
        );
        u.y = y;
        u
    }

    fn field() -> (Vec<Tower>, Crystal) {
        (crate::game::structures::standard_towers(120.0), Crystal::new(150.0))
    }

    #[test]
    fn test_targets_only_units_ahead() {
        let units = vec![
            unit(1, Team::Player, 0, "scout", 500.0),
            unit(2, Team::Enemy, 0, "scout", 600.0), // behind the player unit
            unit(3, Team::Enemy, 0, "scout", 450.0),
            unit(4, Team::Enemy, 2, "scout", 480.0), // other lane
        ];
        let t = nearest_enemy(&units, 0).unwrap();
        assert_eq!(t.target, TargetRef::Unit(2));
        assert!((t.distance - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_equal_distance_prefers_lower_id() {
        let units = vec![
            unit(1, Team::Player, 0, "scout", 500.0),
            unit(9, Team::Enemy, 0, "scout", 470.0),
            unit(5, Team::Enemy, 0, "scout", 470.0),
        ];
        let t = nearest_enemy(&units, 0).unwrap();
        assert_eq!(t.target, TargetRef::Unit(2));

        // Same answer with the list reversed.
        let mut reversed = units.clone();
        reversed.reverse();
        let t = nearest_enemy(&reversed, 2).unwrap();
        let TargetRef::Unit(i) = t.target else {
            panic!("expected a unit target");
        };
        assert_eq!(reversed[i].id, UnitId(5));
    }

    #[test]
    fn test_falls_back_to_tower() {
        let (towers, crystal) = field();
        let units = vec![unit(1, Team::Player, 0, "scout", 120.0)];
        let t = find_target(&units, 0, &towers, &crystal, RULES).unwrap();
        match t.target {
            TargetRef::Tower(i) => {
                assert_eq!(towers[i].team, Team::Enemy);
                assert_eq!(towers[i].lane, LaneId::new(0).unwrap());
            }
            other => panic!("expected tower, got {other:?}"),
        }
        assert!((t.distance - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_dead_tower_not_targeted() {
        let (mut towers, crystal) = field();
        for t in &mut towers {
            t.health = 0.0;
        }
        let units = vec![unit(1, Team::Player, 0, "scout", 120.0)];
        assert!(find_target(&units, 0, &towers, &crystal, RULES).is_none());
    }

    #[test]
    fn test_crystal_only_in_contested_lane_and_within_cap() {
        let (towers, crystal) = field();

        let units = vec![unit(1, Team::Player, 1, "scout", crystal.y + 100.0)];
        let t = find_target(&units, 0, &towers, &crystal, RULES).unwrap();
        assert_eq!(t.target, TargetRef::Crystal);

        // Beyond the engage cap.
        let units = vec![unit(1, Team::Player, 1, "scout", crystal.y + 300.0)];
        assert!(find_target(&units, 0, &towers, &crystal, RULES).is_none());

        // Too far behind.
        let units = vec![unit(1, Team::Player, 1, "scout", crystal.y - 100.0)];
        assert!(find_target(&units, 0, &towers, &crystal, RULES).is_none());

        // Slightly behind is still fine.
        let units = vec![unit(1, Team::Player, 1, "scout", crystal.y - 20.0)];
        assert!(find_target(&units, 0, &towers, &crystal, RULES).is_some());

        // Not when the mode disables targeting.
        let rules = CrystalRules {
            targetable: false,
            ..RULES
        };
        let units = vec![unit(1, Team::Player, 1, "scout", crystal.y + 20.0)];
        assert!(find_target(&units, 0, &towers, &crystal, rules).is_none());
    }

    #[test]
    fn test_nearer_crystal_beats_distant_enemy() {
        let (towers, crystal) = field();
        let units = vec![
            unit(1, Team::Player, 1, "scout", crystal.y + 20.0),
            unit(2, Team::Enemy, 1, "scout", crystal.y - 300.0),
        ];
        let t = find_target(&units, 0, &towers, &crystal, RULES).unwrap();
        assert_eq!(t.target, TargetRef::Crystal);
        assert!((t.distance - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_nearer_enemy_beats_crystal() {
        let (towers, crystal) = field();
        let units = vec![
            unit(1, Team::Player, 1, "scout", crystal.y + 60.0),
            unit(2, Team::Enemy, 1, "scout", crystal.y + 30.0),
        ];
        let t = find_target(&units, 0, &towers, &crystal, RULES).unwrap();
        assert_eq!(t.target, TargetRef::Unit(1));
    }

    #[test]
    fn test_enemy_at_crystal_distance_wins_tie() {
        let (towers, crystal) = field();
        let units = vec![
            unit(1, Team::Player, 1, "scout", crystal.y + 20.0),
            unit(2, Team::Enemy, 1, "scout", crystal.y),
        ];
        let t = find_target(&units, 0, &towers, &crystal, RULES).unwrap();
        assert_eq!(t.target, TargetRef::Unit(1));
    }

    #[test]
    fn test_nearer_tower_beats_distant_enemy() {
        let (towers, crystal) = field();
        let units = vec![
            unit(1, Team::Player, 0, "scout", 120.0),
            unit(2, Team::Enemy, 0, "scout", 20.0),
        ];
        let t = find_target(&units, 0, &towers, &crystal, RULES).unwrap();
        assert!(matches!(t.target, TargetRef::Tower(_)));
    }

    #[test]
    fn test_stacked_spawn_is_blocked() {
        let units = vec![
            unit(1, Team::Player, 0, "scout", 920.0),
            unit(2, Team::Player, 0, "scout", 920.0),
        ];
        assert!(front_ally(&units, 0).is_none());
        assert_eq!(front_ally(&units, 1), Some((0, 0.0)));
        assert!(movement_step(&units, 1, 1.0 / 60.0).is_none());
        assert!(movement_step(&units, 0, 1.0 / 60.0).is_some());
    }

    #[test]
    fn test_step_clamped_to_gap() {
        // Gap 52, distance 53: only one unit of slack.
        let units = vec![
            unit(1, Team::Player, 0, "scout", 500.0),
            unit(2, Team::Player, 0, "scout", 553.0),
        ];
        let step = movement_step(&units, 1, 1.0).unwrap();
        assert!((step - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_blocking_leader_caps_speed() {
        let tank = unit(1, Team::Player, 0, "tank", 500.0);
        let tank_speed = tank.speed();
        // Distance 70: outside the tank's 60 gap but within the slack.
        let units = vec![tank, unit(2, Team::Player, 0, "scout", 570.0)];
        let dt = 1.0 / 60.0;
        let step = movement_step(&units, 1, dt).unwrap();
        assert!((step - tank_speed * dt).abs() < 1e-5);
    }

    #[test]
    fn test_attack_resets_cooldown() {
        let (towers, crystal) = field();
        let units = vec![
            unit(1, Team::Player, 0, "scout", 500.0),
            unit(2, Team::Enemy, 0, "scout", 480.0),
        ];
        let plan = plan_unit(&units, 0, &towers, &crystal, RULES, 0.01);
        assert_eq!(
            plan.action,
            Action::Attack {
                target: TargetRef::Unit(1),
                amount: 4.0
            }
        );
        assert!((plan.cooldown - 0.55).abs() < f32::EPSILON);
    }

    #[test]
    fn test_engaged_unit_holds_during_cooldown() {
        let (towers, crystal) = field();
        let mut units = vec![
            unit(1, Team::Player, 0, "scout", 500.0),
            unit(2, Team::Enemy, 0, "scout", 480.0),
        ];
        units[0].cooldown = 0.3;
        let plan = plan_unit(&units, 0, &towers, &crystal, RULES, 0.01);
        assert_eq!(plan.action, Action::Hold);
        assert!((plan.cooldown - 0.29).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_advances() {
        let (towers, crystal) = field();
        let units = vec![
            unit(1, Team::Player, 0, "scout", 700.0),
            unit(2, Team::Enemy, 0, "scout", 400.0),
        ];
        let plan = plan_unit(&units, 0, &towers, &crystal, RULES, 0.01);
        assert!(matches!(plan.action, Action::Advance(step) if step > 0.0));
    }

    #[test]
    fn test_healer_heals_wounded_ally() {
        let (towers, crystal) = field();
        let mut units = vec![
            unit(1, Team::Player, 0, "scout", 500.0),
            unit(2, Team::Player, 0, "healer", 560.0),
        ];
        units[0].health = 10.0;
        let plan = plan_unit(&units, 1, &towers, &crystal, RULES, 0.01);
        assert_eq!(plan.action, Action::Heal { ally: 0, amount: 4.0 });
    }

    #[test]
    fn test_healer_ignores_healthy_allies_and_never_attacks() {
        let (towers, crystal) = field();
        let units = vec![
            unit(1, Team::Player, 0, "healer", 500.0),
            unit(2, Team::Enemy, 0, "scout", 480.0),
        ];
        let plan = plan_unit(&units, 0, &towers, &crystal, RULES, 0.01);
        assert_eq!(plan.action, Action::Hold);
    }

    #[test]
    fn test_plan_all_skips_dead() {
        let (towers, crystal) = field();
        let mut units = vec![
            unit(1, Team::Player, 0, "scout", 700.0),
            unit(2, Team::Enemy, 2, "scout", 300.0),
        ];
        units[1].health = 0.0;
        let plans = plan_all(&units, &towers, &crystal, RULES, 0.01);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].unit, 0);
    }
}
