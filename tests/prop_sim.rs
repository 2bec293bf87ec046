//! Property-based tests for the match simulation.
//!
//! Random seeds, frame deltas and deploy scripts are thrown at a match and
//! the structural invariants are checked after every tick.
//! Run with: cargo test --release prop_sim

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use lanecrystal::game::invariants::check_invariants;
use lanecrystal::game::{CATALOG, LANE_COUNT};
use lanecrystal::{MatchConfig, MatchState, ObjectiveMode, SimEvent, Team, UnitId};

#[derive(Debug, Clone)]
enum Step {
    Deploy { team: Team, card: usize, lane: usize },
    Tick(f32),
}

fn team() -> impl Strategy<Value = Team> {
    prop_oneof![Just(Team::Player), Just(Team::Enemy)]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => (team(), 0..CATALOG.len(), 0..LANE_COUNT + 1)
            .prop_map(|(team, card, lane)| Step::Deploy { team, card, lane }),
        3 => (0.0f32..0.2).prop_map(Step::Tick),
    ]
}

fn objective() -> impl Strategy<Value = ObjectiveMode> {
    prop_oneof![Just(ObjectiveMode::HitBonus), Just(ObjectiveMode::ZoneControl)]
}

fn run(state: &mut MatchState, steps: &[Step]) -> Result<(), TestCaseError> {
    for step in steps {
        match *step {
            Step::Deploy { team, card, lane } => {
                let before = state.economy.mana(team);
                let units = state.units.len();
                if state.deploy(team, CATALOG[card].id, lane).is_ok() {
                    prop_assert_eq!(state.units.len(), units + 1);
                    let spent = before - state.economy.mana(team);
                    prop_assert!((spent - CATALOG[card].cost).abs() < 1e-4);
                } else {
                    prop_assert_eq!(state.units.len(), units);
                    prop_assert!((state.economy.mana(team) - before).abs() < f32::EPSILON);
                }
            }
            Step::Tick(dt) => {
                state.tick(dt);
            }
        }
        let violations = check_invariants(state);
        prop_assert!(violations.is_empty(), "{:?}", violations);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Invariants hold under any script of deploys and frame deltas.
    #[test]
    fn prop_scripted_match_keeps_invariants(
        seed in any::<u64>(),
        objective in objective(),
        steps in prop::collection::vec(step(), 1..400)
    ) {
        let config = MatchConfig {
            objective,
            mana_start: 10.0,
            ai_initial_delay: 0.5,
            ..MatchConfig::default()
        };
        let mut state = MatchState::new(config, seed);
        run(&mut state, &steps)?;
    }

    /// Two autopilot sides never break invariants and the match stays
    /// single-fire.
    #[test]
    fn prop_autopilot_match(seed in any::<u64>(), dt in 0.005f32..0.1) {
        let config = MatchConfig {
            autopilot: true,
            ..MatchConfig::default()
        };
        let mut state = MatchState::new(config, seed);
        let mut ended = 0;
        let mut steps = 0;
        while steps < 20_000 && state.time() < 240.0 {
            ended += state
                .tick(dt)
                .iter()
                .filter(|e| matches!(e, SimEvent::MatchEnded { .. }))
                .count();
            steps += 1;
            let violations = check_invariants(&state);
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
        prop_assert!(ended <= 1);
        prop_assert_eq!(ended == 1, !state.is_playing());
    }

    /// Mana stays inside `[0, cap]` whatever regen and bonus are configured.
    #[test]
    fn prop_mana_bounded(
        seed in any::<u64>(),
        regen in 0.0f32..20.0,
        bonus in 0.0f32..20.0,
        dts in prop::collection::vec(0.0f32..1.0, 1..200)
    ) {
        let config = MatchConfig {
            mana_regen: regen,
            crystal_hit_bonus: bonus,
            autopilot: true,
            ai_initial_delay: 0.0,
            ..MatchConfig::default()
        };
        let mut state = MatchState::new(config, seed);
        for dt in dts {
            state.tick(dt);
            for team in Team::BOTH {
                let mana = state.economy.mana(team);
                prop_assert!((0.0..=state.config().mana_cap).contains(&mana), "{team}: {mana}");
            }
        }
    }

    /// Same-team units in a lane never pass each other.
    #[test]
    fn prop_no_overtaking(
        lane in 0..LANE_COUNT,
        cards in prop::collection::vec(0..CATALOG.len(), 2..4),
        ticks in 1usize..900
    ) {
        let config = MatchConfig {
            mana_start: 20.0,
            mana_cap: 20.0,
            ai_initial_delay: 1.0e6,
            ..MatchConfig::default()
        };
        let mut state = MatchState::new(config, 7);
        for card in cards {
            state.deploy(Team::Player, CATALOG[card].id, lane).unwrap();
        }
        for _ in 0..ticks {
            state.tick(1.0 / 60.0);
            let mut ys: Vec<(UnitId, f32)> = state.units.iter().map(|u| (u.id, u.y)).collect();
            ys.sort_by_key(|&(id, _)| id);
            // Player units march toward smaller y; earlier spawns stay in front.
            for pair in ys.windows(2) {
                prop_assert!(pair[0].1 <= pair[1].1, "{:?}", pair);
            }
        }
    }

    /// A unit never lands two hits closer together than its attack interval.
    #[test]
    fn prop_attack_rate(card in 0..CATALOG.len(), dt in 0.005f32..0.05) {
        let archetype = &CATALOG[card];
        prop_assume!(!archetype.capabilities.support);

        let config = MatchConfig {
            mana_start: 10.0,
            ai_initial_delay: 1.0e6,
            ..MatchConfig::default()
        };
        let mut state = MatchState::new(config, 3);
        let attacker = state.deploy(Team::Player, archetype.id, 0).unwrap();
        state.deploy(Team::Enemy, "tank", 0).unwrap();
        state.units[0].y = 500.0;
        state.units[1].y = 500.0 - archetype.range.min(40.0) + 1.0;

        let mut last: Option<f32> = None;
        while state.time() < 4.0 && state.is_playing() {
            let now = state.time();
            let hit = state
                .tick(dt)
                .iter()
                .any(|e| matches!(e, SimEvent::Hit { attacker: a, .. } if *a == attacker));
            if hit {
                if let Some(prev) = last {
                    prop_assert!(now - prev >= archetype.attack_interval - 1e-3);
                }
                last = Some(now);
            }
            if state.units.len() < 2 {
                break;
            }
        }
    }
}
