//! The opponent policy.
//!
//! A countdown gates each decision. When it expires the policy picks a
//! random affordable archetype and a random lane, then re-arms with a fresh
//! random delay. It keeps no memory of the board.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::MatchConfig;
use crate::game::lane::LANE_COUNT;
use crate::game::{Archetype, Economy, LaneId, Team, CATALOG};

/// A deployment the policy wants to make.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Archetype to deploy.
    pub archetype: &'static Archetype,
    /// Lane to deploy into.
    pub lane: LaneId,
}

/// Timer-driven random deployer for one team.
// Live match state; an implicit copy would silently fork it.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentPolicy {
    team: Team,
    timer: f32,
    interval_min: f32,
    interval_max: f32,
}

impl OpponentPolicy {
    /// Policy for `team` with the configured delays.
    #[must_use]
    pub fn new(team: Team, config: &MatchConfig) -> Self {
        Self {
            team,
            timer: config.ai_initial_delay,
            interval_min: config.ai_interval_min,
            interval_max: config.ai_interval_max,
        }
    }

    /// Team this policy plays for.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Seconds until the next decision.
    #[must_use]
    pub const fn timer(&self) -> f32 {
        self.timer
    }

    /// Count down and, on expiry, choose what to deploy.
    ///
    /// The timer re-arms whenever it fires, including cycles where nothing
    /// is affordable.
    pub fn decide<R: Rng>(&mut self, dt: f32, rng: &mut R, economy: &Economy) -> Option<Decision> {
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }
        self.timer = self.rearm(rng);

        let options: Vec<&'static Archetype> = CATALOG
            .iter()
            .filter(|a| economy.can_afford(self.team, a.cost))
            .collect();
        let archetype = *options.choose(rng)?;
        let lane = LaneId::new(rng.random_range(0..LANE_COUNT))?;
        Some(Decision { archetype, lane })
    }

    fn rearm<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.interval_max > self.interval_min {
            rng.random_range(self.interval_min..self.interval_max)
        } else {
            self.interval_min
        }
    }
}
