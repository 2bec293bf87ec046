#![no_main]

//! Config parser fuzzer.
//!
//! Any config that parses and validates must drive a match without
//! breaking invariants.

use lanecrystal::game::invariants::assert_invariants;
use lanecrystal::{MatchConfig, MatchState};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<MatchConfig>(data) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }
    let config = MatchConfig {
        autopilot: true,
        ..config
    };
    let mut state = MatchState::new(config, 0);
    for _ in 0..600 {
        state.tick(1.0 / 60.0);
        assert_invariants(&state);
    }
});
