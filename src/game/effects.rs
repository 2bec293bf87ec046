//! Simulation events and the short-lived visuals derived from them.
//!
//! The tick emits [`SimEvent`]s; nothing in here feeds back into the
//! simulation. [`Effects`] is owned by the match so floating text and
//! particles age with the same `dt`, but a renderer is free to ignore it
//! and consume the events directly.

use rand::Rng;
use serde::Serialize;

use crate::game::lane::FRAME_RATE;
use crate::game::{LaneId, Outcome, Team, UnitId};

/// Seconds a floating number stays on screen.
pub const FLOAT_LIFE: f32 = 1.0;
/// Upward drift of floating numbers, per second.
pub const FLOAT_RISE: f32 = 30.0;
/// Particles spawned per hit.
pub const PARTICLES_PER_HIT: usize = 10;
/// Downward acceleration per frame squared.
pub const PARTICLE_GRAVITY: f32 = 0.08;

const UNIT_FLOAT_OFFSET: f32 = -24.0;

/// What a hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTarget {
    /// A unit.
    Unit(UnitId),
    /// A tower.
    Tower {
        /// Owner of the tower.
        team: Team,
        /// Lane of the tower.
        lane: LaneId,
    },
    /// The crystal.
    Crystal,
}

impl HitTarget {
    /// Vertical offset of the floating number above the target.
    #[must_use]
    pub const fn float_offset(self) -> f32 {
        match self {
            Self::Unit(_) => UNIT_FLOAT_OFFSET,
            Self::Tower { .. } => -40.0,
            Self::Crystal => -26.0,
        }
    }
}

/// Something that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// A unit entered the field.
    Spawned {
        /// New unit.
        id: UnitId,
        /// Its team.
        team: Team,
        /// Its lane.
        lane: LaneId,
        /// Archetype id.
        archetype: &'static str,
    },
    /// Damage was dealt.
    Hit {
        /// Attacking unit.
        attacker: UnitId,
        /// Attacker's team.
        team: Team,
        /// What was hit.
        target: HitTarget,
        /// Damage after lane modifiers.
        amount: f32,
        /// Target position.
        x: f32,
        /// Target position.
        y: f32,
    },
    /// A support unit restored health.
    Healed {
        /// Healing unit.
        healer: UnitId,
        /// Healed ally.
        target: UnitId,
        /// Health actually restored.
        amount: f32,
        /// Ally position.
        x: f32,
        /// Ally position.
        y: f32,
    },
    /// A crystal hit granted mana.
    CrystalBonus {
        /// Team credited.
        team: Team,
        /// Mana granted before clamping.
        amount: f32,
        /// Crystal position.
        x: f32,
        /// Crystal position.
        y: f32,
    },
    /// A unit ran out of health.
    Died {
        /// Removed unit.
        id: UnitId,
        /// Its team.
        team: Team,
        /// Its lane.
        lane: LaneId,
    },
    /// A unit walked off the field and was removed.
    Leaked {
        /// Removed unit.
        id: UnitId,
        /// Its team.
        team: Team,
        /// Its lane.
        lane: LaneId,
    },
    /// The match finished.
    MatchEnded {
        /// Result from the player's point of view.
        outcome: Outcome,
    },
}

/// A rising damage or heal number.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    /// Text to draw.
    pub text: String,
    /// Position.
    pub x: f32,
    /// Position.
    pub y: f32,
    /// Seconds left.
    pub life: f32,
    /// Whether this is a heal or bonus rather than damage.
    pub positive: bool,
}

/// A hit spark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position.
    pub x: f32,
    /// Position.
    pub y: f32,
    /// Velocity per frame.
    pub vx: f32,
    /// Velocity per frame.
    pub vy: f32,
    /// Seconds left.
    pub life: f32,
}

/// All live visual effects.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    /// Floating numbers.
    pub floats: Vec<FloatingText>,
    /// Hit sparks.
    pub particles: Vec<Particle>,
}

impl Effects {
    /// Spawn visuals for this tick's events.
    pub fn absorb<R: Rng>(&mut self, events: &[SimEvent], rng: &mut R) {
        for event in events {
            match *event {
                SimEvent::Hit {
                    target,
                    amount,
                    x,
                    y,
                    ..
                } => {
                    self.float(format!("-{}", amount.round()), x, y + target.float_offset(), false);
                    self.burst(x, y, rng);
                }
                SimEvent::Healed { amount, x, y, .. } => {
                    self.float(
                        format!("+{}", amount.round()),
                        x,
                        y + UNIT_FLOAT_OFFSET,
                        true,
                    );
                }
                SimEvent::CrystalBonus { amount, x, y, .. } => {
                    self.float(
                        format!("+{}", amount.round()),
                        x,
                        y + HitTarget::Crystal.float_offset(),
                        true,
                    );
                }
                _ => {}
            }
        }
    }

    /// Age everything by `dt` seconds and drop what has expired.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let frames = dt * FRAME_RATE;

        for f in &mut self.floats {
            f.y -= FLOAT_RISE * dt;
            f.life -= dt;
        }
        self.floats.retain(|f| f.life > 0.0);

        for p in &mut self.particles {
            p.x += p.vx * frames;
            p.y += p.vy * frames;
            p.vy += PARTICLE_GRAVITY * frames;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Drop every effect.
    pub fn clear(&mut self) {
        self.floats.clear();
        self.particles.clear();
    }

    fn float(&mut self, text: String, x: f32, y: f32, positive: bool) {
        self.floats.push(FloatingText {
            text,
            x,
            y,
            life: FLOAT_LIFE,
            positive,
        });
    }

    fn burst<R: Rng>(&mut self, x: f32, y: f32, rng: &mut R) {
        for _ in 0..PARTICLES_PER_HIT {
            self.particles.push(Particle {
                x,
                y,
                vx: rng.random_range(-1.2..=1.2),
                vy: rng.random_range(-1.8..=-0.4),
                life: rng.random_range(0.3..=0.6),
            });
        }
    }
}
