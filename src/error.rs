//! Error types for deploys, configuration and progression storage.

use std::fmt;
use std::io;

use crate::game::{Team, UnitId};

/// Why a deploy request was turned down.
///
/// A rejected deploy never mutates match state, so callers are free to
/// ignore this value or surface it as transient UI feedback.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployRejected {
    /// The match is no longer in progress.
    MatchOver,
    /// The lane index is outside `0..LANE_COUNT`.
    BadLane(usize),
    /// No archetype with this id exists in the catalog.
    UnknownArchetype(String),
    /// The team cannot afford the archetype.
    InsufficientMana {
        /// Team that tried to deploy.
        team: Team,
        /// Mana required.
        cost: f32,
        /// Mana available.
        available: f32,
    },
}

impl fmt::Display for DeployRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchOver => write!(f, "match is over"),
            Self::BadLane(lane) => write!(f, "lane {lane} does not exist"),
            Self::UnknownArchetype(id) => write!(f, "unknown archetype '{id}'"),
            Self::InsufficientMana {
                team,
                cost,
                available,
            } => write!(
                f,
                "{team} needs {cost:.1} mana but has {available:.1}"
            ),
        }
    }
}

impl std::error::Error for DeployRejected {}

/// Error raised while loading or validating a [`crate::MatchConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(io::Error),
    /// The config file is not valid JSON for `MatchConfig`.
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with.
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid config field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Error raised by a [`crate::progress::ProgressStore`].
#[derive(Debug)]
pub enum StoreError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// Stored record is not a valid progression.
    Corrupt(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "progress store I/O error: {e}"),
            Self::Corrupt(e) => write!(f, "progress record is corrupt: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Corrupt(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupt(e)
    }
}

/// Result type for deploy requests.
pub type DeployResult = Result<UnitId, DeployRejected>;
