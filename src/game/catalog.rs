//! Unit registry: the static catalog of archetypes.
//!
//! Archetypes are immutable and shared by reference; a [`crate::game::Unit`]
//! only carries the fields that change during a match.

/// Optional behaviours of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Followers behind this unit cannot exceed its speed.
    pub blocking: bool,
    /// Heals allies instead of damaging enemies.
    pub support: bool,
    /// Strikes from range; the hit is instant either way.
    pub ranged: bool,
}

/// Stat block for a unit type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Archetype {
    /// Stable identifier used by deploy requests.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Maximum health.
    pub health: f32,
    /// Damage per attack, or healing per cast for support units.
    pub damage: f32,
    /// Movement per 60 Hz frame.
    pub speed: f32,
    /// Reach of attacks and heals.
    pub range: f32,
    /// Seconds between attacks.
    pub attack_interval: f32,
    /// Mana cost to deploy.
    pub cost: f32,
    /// Minimum spacing kept behind an ally.
    pub min_gap: f32,
    /// Optional behaviours.
    pub capabilities: Capabilities,
}

/// Every deployable archetype, in card order.
pub static CATALOG: [Archetype; 4] = [
    Archetype {
        id: "scout",
        name: "Scout",
        health: 24.0,
        damage: 4.0,
        speed: 0.45,
        range: 36.0,
        attack_interval: 0.55,
        cost: 3.0,
        min_gap: 52.0,
        capabilities: Capabilities {
            blocking: false,
            support: false,
            ranged: false,
        },
    },
    Archetype {
        id: "tank",
        name: "Tank",
        health: 80.0,
        damage: 6.0,
        speed: 0.28,
        range: 40.0,
        attack_interval: 0.7,
        cost: 4.0,
        min_gap: 60.0,
        capabilities: Capabilities {
            blocking: true,
            support: false,
            ranged: false,
        },
    },
    Archetype {
        id: "spark",
        name: "Spark",
        health: 18.0,
        damage: 5.0,
        speed: 0.32,
        range: 90.0,
        attack_interval: 0.6,
        cost: 2.0,
        min_gap: 48.0,
        capabilities: Capabilities {
            blocking: false,
            support: false,
            ranged: true,
        },
    },
    Archetype {
        id: "healer",
        name: "Healer",
        health: 36.0,
        damage: 4.0,
        speed: 0.30,
        range: 70.0,
        attack_interval: 1.0,
        cost: 3.0,
        min_gap: 48.0,
        capabilities: Capabilities {
            blocking: false,
            support: true,
            ranged: true,
        },
    },
];

impl Archetype {
    /// Short label for card lists.
    #[must_use]
    pub const fn role(&self) -> &'static str {
        let caps = self.capabilities;
        if caps.support {
            "support"
        } else if caps.blocking {
            "blocker"
        } else if caps.ranged {
            "ranged"
        } else {
            "melee"
        }
    }
}

/// Look up an archetype by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static Archetype> {
    CATALOG.iter().find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known_and_unknown() {
        let scout = find("scout").unwrap();
        assert_eq!(scout.name, "Scout");
        assert!((scout.health - 24.0).abs() < f32::EPSILON);
        assert!(find("golem").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_stats_are_sane() {
        for a in &CATALOG {
            assert!(a.health > 0.0, "{} health", a.id);
            assert!(a.speed > 0.0, "{} speed", a.id);
            assert!(a.attack_interval > 0.0, "{} interval", a.id);
            assert!(a.cost > 0.0, "{} cost", a.id);
            assert!(a.min_gap > 0.0, "{} gap", a.id);
        }
    }

    #[test]
    fn test_roles() {
        let roles: Vec<_> = CATALOG.iter().map(Archetype::role).collect();
        assert_eq!(roles, vec!["melee", "blocker", "ranged", "support"]);
    }

    #[test]
    fn test_only_healer_supports() {
        let supports: Vec<_> = CATALOG
            .iter()
            .filter(|a| a.capabilities.support)
            .map(|a| a.id)
            .collect();
        assert_eq!(supports, vec!["healer"]);
        assert!(find("tank").unwrap().capabilities.blocking);
    }
}
