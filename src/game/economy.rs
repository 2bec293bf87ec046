//! Resource economy: one regenerating mana pool per team.
//!
//! Both pools regenerate at the same base rate. When the crystal runs in
//! zone-control mode, the team holding the zone gets an extra rate on top.
//! Every mutation clamps to `[0, cap]`, so no sequence of calls can push a
//! pool outside its bounds.

use crate::game::Team;

/// Mana pools for both teams.
// Live match state; an implicit copy would silently fork it.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq)]
pub struct Economy {
    pools: [f32; 2],
    cap: f32,
    base_rate: f32,
    zone_rate: f32,
}

impl Economy {
    /// Create pools filled to `start`.
    #[must_use]
    pub fn new(start: f32, cap: f32, base_rate: f32, zone_rate: f32) -> Self {
        let start = start.clamp(0.0, cap);
        Self {
            pools: [start; 2],
            cap,
            base_rate,
            zone_rate,
        }
    }

    /// Current mana of a team.
    #[must_use]
    pub fn mana(&self, team: Team) -> f32 {
        self.pools[team.index()]
    }

    /// Upper bound shared by both pools.
    #[must_use]
    pub const fn cap(&self) -> f32 {
        self.cap
    }

    /// Regenerate both pools over `dt` seconds.
    ///
    /// `zone_holder` is the team that strictly outnumbers the other near the
    /// crystal this tick, if any.
    pub fn regen(&mut self, dt: f32, zone_holder: Option<Team>) {
        if dt <= 0.0 {
            return;
        }
        for team in Team::BOTH {
            let mut gain = self.base_rate * dt;
            if zone_holder == Some(team) {
                gain += self.zone_rate * dt;
            }
            self.add(team, gain);
        }
    }

    /// Add a one-off bonus, clamped to the cap.
    pub fn grant(&mut self, team: Team, amount: f32) {
        self.add(team, amount);
    }

    /// Debit `amount` if the team can afford it.
    ///
    /// Returns `false` and leaves the pool untouched otherwise.
    pub fn spend(&mut self, team: Team, amount: f32) -> bool {
        let pool = &mut self.pools[team.index()];
        if amount.is_nan() || amount < 0.0 || *pool < amount {
            return false;
        }
        *pool = (*pool - amount).clamp(0.0, self.cap);
        true
    }

    /// Whether a team could pay `amount` right now.
    #[must_use]
    pub fn can_afford(&self, team: Team, amount: f32) -> bool {
        self.mana(team) >= amount
    }

    /// Refill both pools to `start`.
    pub fn reset(&mut self, start: f32) {
        self.pools = [start.clamp(0.0, self.cap); 2];
    }

    fn add(&mut self, team: Team, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        let pool = &mut self.pools[team.index()];
        *pool = (*pool + amount).clamp(0.0, self.cap);
    }
}
