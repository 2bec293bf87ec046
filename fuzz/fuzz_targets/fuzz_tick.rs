#![no_main]

//! Match simulation fuzzer.
//!
//! Drives a match with an arbitrary script of deploys, taps and frame
//! deltas (including zero, negative and non-finite ones) and checks the
//! match invariants after every step.

use arbitrary::Arbitrary;
use lanecrystal::game::invariants::assert_invariants;
use lanecrystal::game::CATALOG;
use lanecrystal::progress::MemoryStore;
use lanecrystal::{MatchConfig, ObjectiveMode, Session, Team};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated step.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzStep {
    /// Deploy a card for either side.
    Deploy { enemy: bool, card: u8, lane: u8 },
    /// Tap the screen at pixel coordinates.
    Tap { x: i16, y: i16 },
    /// Advance by an arbitrary delta.
    Tick(f32),
    /// Advance by a handful of regular frames.
    Frames(u8),
    /// Start over.
    Restart,
}

/// Structured input for match fuzzing.
#[derive(Arbitrary, Debug)]
struct MatchInput {
    seed: u64,
    zone_control: bool,
    autopilot: bool,
    steps: Vec<FuzzStep>,
}

fuzz_target!(|input: MatchInput| {
    if input.steps.len() > 2_000 {
        return;
    }
    let config = MatchConfig {
        objective: if input.zone_control {
            ObjectiveMode::ZoneControl
        } else {
            ObjectiveMode::HitBonus
        },
        autopilot: input.autopilot,
        ..MatchConfig::default()
    };
    let mut session = Session::new(config, input.seed, MemoryStore::default());

    for step in input.steps {
        match step {
            FuzzStep::Deploy { enemy, card, lane } => {
                let team = if enemy { Team::Enemy } else { Team::Player };
                let archetype = CATALOG[usize::from(card) % CATALOG.len()].id;
                let _ = session.state_mut().deploy(team, archetype, usize::from(lane));
            }
            FuzzStep::Tap { x, y } => {
                session.tap(f32::from(x), f32::from(y));
            }
            FuzzStep::Tick(dt) => {
                session.frame(dt);
            }
            FuzzStep::Frames(n) => {
                for _ in 0..n {
                    session.frame(1.0 / 60.0);
                }
            }
            FuzzStep::Restart => session.restart(),
        }
        assert_invariants(session.state());
    }
});
