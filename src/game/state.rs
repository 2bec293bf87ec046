//! Match state and the per-tick update.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::error::{DeployRejected, DeployResult};
use crate::game::combat::{self, Action, CrystalRules, TargetRef};
use crate::game::lane::in_bounds;
use crate::game::structures::standard_towers;
use crate::game::{
    catalog, Archetype, Crystal, Economy, Effects, HitTarget, LaneId, ObjectiveMode,
    OpponentPolicy, Outcome, OutcomeTracker, Progression, SimEvent, Snapshot, Team, Tower, Unit,
    UnitId,
};

/// Salt separating the effects RNG stream from the simulation stream.
const EFFECTS_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Complete state of one match plus the progression carried between matches.
///
/// Deploys happen between ticks through `&mut self`, so they can never
/// interleave with a unit update; they are visible to the next tick.
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Live units in spawn order.
    pub units: Vec<Unit>,
    /// The four towers. Never removed.
    pub towers: Vec<Tower>,
    /// The contested crystal.
    pub crystal: Crystal,
    /// Mana pools.
    pub economy: Economy,
    /// Floating text and particles.
    pub effects: Effects,
    config: MatchConfig,
    seed: u64,
    rng: StdRng,
    fx_rng: StdRng,
    policies: Vec<OpponentPolicy>,
    tracker: OutcomeTracker,
    progression: Progression,
    time: f32,
    next_id: u64,
    events: Vec<SimEvent>,
    pending: Vec<SimEvent>,
}

impl MatchState {
    /// Start a match. The same `(config, seed)` always plays out the same way.
    #[must_use]
    pub fn new(config: MatchConfig, seed: u64) -> Self {
        let policies = Self::policies_for(&config);
        Self {
            units: Vec::new(),
            towers: standard_towers(config.tower_health),
            crystal: Crystal::new(config.crystal_health),
            economy: Economy::new(
                config.mana_start,
                config.mana_cap,
                config.mana_regen,
                config.zone_regen_bonus,
            ),
            effects: Effects::default(),
            rng: StdRng::seed_from_u64(seed),
            fx_rng: StdRng::seed_from_u64(seed ^ EFFECTS_SEED_SALT),
            policies,
            tracker: OutcomeTracker::new(),
            progression: Progression::default(),
            time: 0.0,
            next_id: 1,
            events: Vec::new(),
            pending: Vec::new(),
            seed,
            config,
        }
    }

    fn policies_for(config: &MatchConfig) -> Vec<OpponentPolicy> {
        let mut policies = vec![OpponentPolicy::new(Team::Enemy, config)];
        if config.autopilot {
            policies.push(OpponentPolicy::new(Team::Player, config));
        }
        policies
    }

    /// Reset everything about the match. Progression and the RNG stream
    /// carry over.
    pub fn restart(&mut self) {
        self.units.clear();
        self.towers = standard_towers(self.config.tower_health);
        self.crystal.reset();
        self.economy.reset(self.config.mana_start);
        self.effects.clear();
        self.policies = Self::policies_for(&self.config);
        self.tracker.reset();
        self.time = 0.0;
        self.next_id = 1;
        self.events.clear();
        self.pending.clear();
        debug!("match restarted");
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Seed the match was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulated seconds of play. Stops advancing when the match ends.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// Whether the match is still running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.tracker.is_playing()
    }

    /// Final result, once the match is over.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.tracker.outcome()
    }

    /// Progression record.
    #[must_use]
    pub const fn progression(&self) -> Progression {
        self.progression
    }

    /// Replace the progression record, e.g. with one loaded from disk.
    pub fn set_progression(&mut self, progression: Progression) {
        self.progression = progression;
    }

    /// Events produced by the most recent tick.
    #[must_use]
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Number of standing towers of a team.
    #[must_use]
    pub fn alive_towers(&self, team: Team) -> usize {
        self.towers
            .iter()
            .filter(|t| t.team == team && t.is_alive())
            .count()
    }

    /// Read-only view for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Deploy an archetype by id.
    ///
    /// # Errors
    ///
    /// Returns [`DeployRejected`] if the match is over, the lane is out of
    /// range, the id is unknown or the team cannot pay. Nothing changes in
    /// any of those cases.
    pub fn deploy(&mut self, team: Team, archetype: &str, lane: usize) -> DeployResult {
        if !self.is_playing() {
            return Err(DeployRejected::MatchOver);
        }
        let lane = LaneId::new(lane).ok_or(DeployRejected::BadLane(lane))?;
        let archetype = catalog::find(archetype)
            .ok_or_else(|| DeployRejected::UnknownArchetype(archetype.to_owned()))?;
        self.deploy_archetype(team, archetype, lane)
    }

    fn deploy_archetype(
        &mut self,
        team: Team,
        archetype: &'static Archetype,
        lane: LaneId,
    ) -> DeployResult {
        if !self.is_playing() {
            return Err(DeployRejected::MatchOver);
        }
        let available = self.economy.mana(team);
        if !self.economy.spend(team, archetype.cost) {
            return Err(DeployRejected::InsufficientMana {
                team,
                cost: archetype.cost,
                available,
            });
        }

        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.push(Unit::spawn(id, team, lane, archetype));
        self.pending.push(SimEvent::Spawned {
            id,
            team,
            lane,
            archetype: archetype.id,
        });
        debug!(%team, archetype = archetype.id, lane = lane.index(), id = id.0, "deployed");
        Ok(id)
    }

    /// Team that strictly outnumbers the other near the crystal, if the
    /// objective runs in zone-control mode.
    #[must_use]
    pub fn zone_holder(&self) -> Option<Team> {
        if self.config.objective != ObjectiveMode::ZoneControl {
            return None;
        }
        let cx = self.crystal.lane.lane().x;
        let cy = self.crystal.y;
        let radius = self.config.zone_radius;
        let mut counts = [0usize; 2];
        for unit in self.units.iter().filter(|u| u.is_alive()) {
            let dx = unit.lane.lane().x - cx;
            let dy = unit.y - cy;
            if dx.hypot(dy) <= radius {
                counts[unit.team.index()] += 1;
            }
        }
        match counts[0].cmp(&counts[1]) {
            std::cmp::Ordering::Greater => Some(Team::Player),
            std::cmp::Ordering::Less => Some(Team::Enemy),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn crystal_rules(&self) -> CrystalRules {
        CrystalRules {
            targetable: self.config.objective == ObjectiveMode::HitBonus,
            engage_distance: self.config.crystal_engage_distance,
            behind_allowance: self.config.crystal_behind_allowance,
        }
    }

    /// Advance the match by `dt` seconds.
    ///
    /// `dt` is clamped to the configured maximum; zero, negative or
    /// non-finite deltas do nothing. Once the match has ended only the
    /// visual effects keep aging.
    pub fn tick(&mut self, dt: f32) -> &[SimEvent] {
        self.events.clear();
        if !dt.is_finite() || dt <= 0.0 {
            return &self.events;
        }
        let dt = dt.min(self.config.max_dt);
        self.events.append(&mut self.pending);

        if self.is_playing() {
            self.time += dt;
            let holder = self.zone_holder();
            self.economy.regen(dt, holder);
            self.update_units(dt);
            self.run_policies(dt);
            self.check_outcome();
        }

        self.effects.absorb(&self.events, &mut self.fx_rng);
        self.effects.update(dt);
        self.crystal.decay(dt);
        &self.events
    }

    fn update_units(&mut self, dt: f32) {
        let mut plans = combat::plan_all(
            &self.units,
            &self.towers,
            &self.crystal,
            self.crystal_rules(),
            dt,
        );
        plans.sort_by_key(|p| self.units[p.unit].id);

        // Heals land before damage so the order of plans cannot revive a
        // unit killed this tick.
        let mut damage = vec![0.0_f32; self.units.len()];
        let mut healing = vec![0.0_f32; self.units.len()];
        // (healer, ally, amount, healing already queued for the ally)
        let mut heals = Vec::new();

        for plan in &plans {
            let (id, team) = {
                let unit = &mut self.units[plan.unit];
                unit.cooldown = plan.cooldown;
                (unit.id, unit.team)
            };
            match plan.action {
                Action::Advance(step) => {
                    self.units[plan.unit].y += step * team.direction();
                }
                Action::Hold | Action::Blocked => {}
                Action::Heal { ally, amount } => {
                    heals.push((id, ally, amount, healing[ally]));
                    healing[ally] += amount;
                }
                Action::Attack { target, amount } => {
                    self.apply_attack(id, team, target, amount, &mut damage);
                }
            }
        }

        // Each healer is credited with what it restored on top of the
        // healers before it.
        for (healer, ally, amount, queued) in heals {
            let target = &self.units[ally];
            if !target.is_alive() {
                continue;
            }
            let missing = (target.archetype.health - target.health - queued).max(0.0);
            self.events.push(SimEvent::Healed {
                healer,
                target: target.id,
                amount: amount.min(missing),
                x: target.lane.lane().x,
                y: target.y,
            });
        }

        for (i, unit) in self.units.iter_mut().enumerate() {
            if healing[i] > 0.0 && unit.is_alive() {
                unit.health = (unit.health + healing[i]).min(unit.archetype.health);
            }
            unit.health = (unit.health - damage[i]).max(0.0);
        }

        let events = &mut self.events;
        self.units.retain(|unit| {
            if !unit.is_alive() {
                events.push(SimEvent::Died {
                    id: unit.id,
                    team: unit.team,
                    lane: unit.lane,
                });
                false
            } else if !in_bounds(unit.y) {
                events.push(SimEvent::Leaked {
                    id: unit.id,
                    team: unit.team,
                    lane: unit.lane,
                });
                false
            } else {
                true
            }
        });
    }

    fn apply_attack(
        &mut self,
        attacker: UnitId,
        team: Team,
        target: TargetRef,
        amount: f32,
        damage: &mut [f32],
    ) {
        match target {
            TargetRef::Unit(i) => {
                let victim = &self.units[i];
                let dealt = amount * victim.lane.lane().modifiers.damage_taken;
                damage[i] += dealt;
                self.events.push(SimEvent::Hit {
                    attacker,
                    team,
                    target: HitTarget::Unit(victim.id),
                    amount: dealt,
                    x: victim.lane.lane().x,
                    y: victim.y,
                });
            }
            TargetRef::Tower(i) => {
                let tower = &mut self.towers[i];
                let dealt = tower.take_damage(amount);
                self.events.push(SimEvent::Hit {
                    attacker,
                    team,
                    target: HitTarget::Tower {
                        team: tower.team,
                        lane: tower.lane,
                    },
                    amount: dealt,
                    x: tower.lane.lane().x,
                    y: tower.y,
                });
                if !tower.is_alive() {
                    debug!(owner = %tower.team, lane = tower.lane.index(), "tower destroyed");
                }
            }
            TargetRef::Crystal => {
                // An earlier attack this tick may have emptied it.
                if !self.crystal.is_alive() {
                    return;
                }
                let dealt = self.crystal.hit(team, amount);
                let bonus = self.config.crystal_hit_bonus;
                self.economy.grant(team, bonus);
                let (x, y) = (self.crystal.lane.lane().x, self.crystal.y);
                self.events.push(SimEvent::Hit {
                    attacker,
                    team,
                    target: HitTarget::Crystal,
                    amount: dealt,
                    x,
                    y,
                });
                self.events.push(SimEvent::CrystalBonus {
                    team,
                    amount: bonus,
                    x,
                    y,
                });
            }
        }
    }

    fn run_policies(&mut self, dt: f32) {
        let mut decisions = Vec::new();
        for policy in &mut self.policies {
            if let Some(decision) = policy.decide(dt, &mut self.rng, &self.economy) {
                decisions.push((policy.team(), decision));
            }
        }
        for (team, decision) in decisions {
            if let Err(err) = self.deploy_archetype(team, decision.archetype, decision.lane) {
                debug!(%team, %err, "policy deploy rejected");
            }
        }
        self.events.append(&mut self.pending);
    }

    fn check_outcome(&mut self) {
        let player = self.alive_towers(Team::Player);
        let enemy = self.alive_towers(Team::Enemy);
        let Some(outcome) = self.tracker.observe(player, enemy) else {
            return;
        };
        if outcome == Outcome::Victory {
            let levelled = self
                .progression
                .record_win(self.config.wins_per_level, self.config.max_tier);
            if levelled {
                info!(level = self.progression.level, tier = self.progression.tier, "level up");
            }
        }
        info!(%outcome, time = self.time, wins = self.progression.wins, "match ended");
        self.events.push(SimEvent::MatchEnded { outcome });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> MatchConfig {
        MatchConfig {
            ai_initial_delay: 1.0e6,
            ..MatchConfig::default()
        }
    }

    #[test]
    fn test_new_match() {
        let state = MatchState::new(MatchConfig::default(), 1);
        assert!(state.is_playing());
        assert!(state.units.is_empty());
        assert_eq!(state.alive_towers(Team::Player), 2);
        assert_eq!(state.alive_towers(Team::Enemy), 2);
        assert!((state.economy.mana(Team::Player) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_deploy_spends_and_spawns() {
        let mut state = MatchState::new(quiet(), 1);
        let id = state.deploy(Team::Player, "scout", 0).unwrap();
        assert_eq!(id, UnitId(1));
        assert!((state.economy.mana(Team::Player) - 2.0).abs() < 1e-5);
        assert_eq!(state.units.len(), 1);
        assert!((state.units[0].y - 920.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejected_deploys_change_nothing() {
        let mut state = MatchState::new(quiet(), 1);
        assert_eq!(
            state.deploy(Team::Player, "scout", 3),
            Err(DeployRejected::BadLane(3))
        );
        assert!(matches!(
            state.deploy(Team::Player, "golem", 0),
            Err(DeployRejected::UnknownArchetype(_))
        ));
        state.deploy(Team::Player, "tank", 0).unwrap();
        assert!(matches!(
            state.deploy(Team::Player, "tank", 0),
            Err(DeployRejected::InsufficientMana { .. })
        ));
        assert_eq!(state.units.len(), 1);
        assert!((state.economy.mana(Team::Player) - 1.0).abs() < 1e-5);
        assert!(state.is_playing());
    }

    #[test]
    fn test_spawn_event_reported_next_tick() {
        let mut state = MatchState::new(quiet(), 1);
        state.deploy(Team::Enemy, "spark", 2).unwrap();
        let events = state.tick(0.016);
        assert!(matches!(events[0], SimEvent::Spawned { team: Team::Enemy, .. }));
        assert!(state.tick(0.016).is_empty());
    }

    #[test]
    fn test_bad_dt_is_noop() {
        let mut state = MatchState::new(quiet(), 1);
        state.deploy(Team::Player, "scout", 0).unwrap();
        let before = state.units[0].y;
        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            state.tick(dt);
        }
        assert!((state.units[0].y - before).abs() < f32::EPSILON);
        assert!(state.time().abs() < f32::EPSILON);
    }

    #[test]
    fn test_dt_clamped() {
        let mut state = MatchState::new(quiet(), 1);
        state.tick(5.0);
        assert!((state.time() - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_unit_walks_toward_enemy() {
        let mut state = MatchState::new(quiet(), 1);
        state.deploy(Team::Player, "scout", 0).unwrap();
        state.tick(1.0 / 60.0);
        // 0.45 per frame in a side lane.
        assert!((state.units[0].y - (920.0 - 0.45)).abs() < 1e-3);
    }

    #[test]
    fn test_leaving_field_removes_unit() {
        let mut state = MatchState::new(quiet(), 1);
        state.deploy(Team::Player, "scout", 1).unwrap();
        state.units[0].y = 40.2;
        let events = state.tick(1.0 / 60.0).to_vec();
        assert!(state.units.is_empty());
        assert!(events.iter().any(|e| matches!(e, SimEvent::Leaked { .. })));
    }

    #[test]
    fn test_opponent_deploys_after_delay() {
        let mut state = MatchState::new(MatchConfig::default(), 3);
        for _ in 0..130 {
            state.tick(1.0 / 60.0);
        }
        assert!(state.units.iter().any(|u| u.team == Team::Enemy));
        assert!(state.units.iter().all(|u| u.team == Team::Enemy));
    }

    #[test]
    fn test_autopilot_deploys_for_player() {
        let config = MatchConfig {
            autopilot: true,
            ..MatchConfig::default()
        };
        let mut state = MatchState::new(config, 3);
        for _ in 0..(60 * 3) {
            state.tick(1.0 / 60.0);
        }
        assert!(state.units.iter().any(|u| u.team == Team::Player));
    }

    #[test]
    fn test_zone_holder_counts_presence() {
        let config = MatchConfig {
            objective: ObjectiveMode::ZoneControl,
            ..quiet()
        };
        let mut state = MatchState::new(config, 1);
        assert_eq!(state.zone_holder(), None);

        state.deploy(Team::Player, "spark", 1).unwrap();
        state.units[0].y = state.crystal.y + 50.0;
        assert_eq!(state.zone_holder(), Some(Team::Player));

        state.deploy(Team::Enemy, "spark", 1).unwrap();
        state.units[1].y = state.crystal.y - 50.0;
        assert_eq!(state.zone_holder(), None);

        // Side lanes are too far from the crystal to count.
        state.deploy(Team::Enemy, "spark", 0).unwrap();
        state.units[2].y = state.crystal.y;
        assert_eq!(state.zone_holder(), None);
    }

    #[test]
    fn test_zone_control_never_hits_crystal() {
        let config = MatchConfig {
            objective: ObjectiveMode::ZoneControl,
            ..quiet()
        };
        let mut state = MatchState::new(config, 1);
        state.deploy(Team::Player, "spark", 1).unwrap();
        state.units[0].y = state.crystal.y + 30.0;
        state.tick(1.0 / 60.0);
        assert!((state.crystal.health - 150.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mid_lane_damage_multiplier() {
        let mut state = MatchState::new(quiet(), 1);
        state.deploy(Team::Player, "scout", 1).unwrap();
        state.deploy(Team::Enemy, "scout", 1).unwrap();
        state.units[0].y = 300.0;
        state.units[1].y = 280.0;
        state.tick(1.0 / 60.0);
        let expected = 24.0 - 4.0 * 1.15;
        assert!((state.units[0].health - expected).abs() < 1e-4);
        assert!((state.units[1].health - expected).abs() < 1e-4);
    }

    #[test]
    fn test_restart_keeps_progression() {
        let mut state = MatchState::new(quiet(), 1);
        state.set_progression(Progression {
            wins: 4,
            level: 2,
            tier: 2,
        });
        state.deploy(Team::Player, "scout", 0).unwrap();
        state.towers[0].health = 0.0;
        state.tick(0.01);
        state.restart();

        assert!(state.units.is_empty());
        assert!(state.is_playing());
        assert!(state.towers.iter().all(Tower::is_alive));
        assert!((state.economy.mana(Team::Player) - 5.0).abs() < f32::EPSILON);
        assert_eq!(state.progression().wins, 4);
        assert_eq!(state.deploy(Team::Player, "scout", 0), Ok(UnitId(1)));
    }

    #[test]
    fn test_heal_cannot_revive() {
        let mut state = MatchState::new(quiet(), 1);
        state.deploy(Team::Player, "scout", 0).unwrap();
        state.deploy(Team::Player, "healer", 0).unwrap();
        state.deploy(Team::Enemy, "tank", 0).unwrap();
        state.units[0].y = 500.0;
        state.units[0].health = 1.0;
        state.units[1].y = 560.0;
        state.units[2].y = 470.0;

        state.tick(1.0 / 60.0);
        assert!(state.units.iter().all(|u| u.id != UnitId(1)));
    }

    #[test]
    fn test_emptied_crystal_pays_once() {
        let config = MatchConfig {
            mana_regen: 0.0,
            mana_start: 10.0,
            ..quiet()
        };
        let mut state = MatchState::new(config, 1);
        state.deploy(Team::Player, "scout", 1).unwrap();
        state.deploy(Team::Player, "scout", 1).unwrap();
        state.units[0].y = state.crystal.y + 20.0;
        state.units[1].y = state.crystal.y + 30.0;
        state.crystal.health = 4.0;

        let events = state.tick(1.0 / 60.0).to_vec();

        assert!(state.crystal.health.abs() < f32::EPSILON);
        assert!((state.economy.mana(Team::Player) - 6.0).abs() < 1e-5);
        let bonuses = events
            .iter()
            .filter(|e| matches!(e, SimEvent::CrystalBonus { .. }))
            .count();
        let crystal_hits = events
            .iter()
            .filter(|e| matches!(e, SimEvent::Hit { target: HitTarget::Crystal, .. }))
            .count();
        assert_eq!(bonuses, 1);
        assert_eq!(crystal_hits, 1);
    }

    #[test]
    fn test_crystal_in_range_beats_distant_enemy() {
        let mut state = MatchState::new(quiet(), 1);
        state.deploy(Team::Player, "scout", 1).unwrap();
        state.deploy(Team::Enemy, "scout", 1).unwrap();
        let y = state.crystal.y + 20.0;
        state.units[0].y = y;
        state.units[1].y = state.crystal.y - 300.0;

        state.tick(1.0 / 60.0);

        assert!((state.crystal.health - 146.0).abs() < 1e-4);
        assert_eq!(state.crystal.last_hit_by, Some(Team::Player));
        assert!((state.units[0].y - y).abs() < f32::EPSILON);
    }

    #[test]
    fn test_shared_heal_reports_what_was_restored() {
        let config = MatchConfig {
            mana_start: 10.0,
            ..quiet()
        };
        let mut state = MatchState::new(config, 1);
        let scout = state.deploy(Team::Player, "scout", 0).unwrap();
        state.deploy(Team::Player, "healer", 0).unwrap();
        state.deploy(Team::Player, "healer", 0).unwrap();
        state.units[0].y = 500.0;
        state.units[0].health = 19.0;
        state.units[1].y = 550.0;
        state.units[2].y = 565.0;

        let events = state.tick(1.0 / 60.0).to_vec();

        let restored: Vec<f32> = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Healed { target, amount, .. } if *target == scout => Some(*amount),
                _ => None,
            })
            .collect();
        assert_eq!(restored.len(), 2);
        assert!((restored[0] - 4.0).abs() < 1e-5);
        assert!((restored[1] - 1.0).abs() < 1e-5);
        assert!((state.units[0].health - 24.0).abs() < 1e-5);
    }
}
