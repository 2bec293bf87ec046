// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Lanecrystal: a deterministic three-lane tap battle.
//!
//! Two sides deploy units into three parallel lanes. Units walk toward the
//! enemy, queue behind allies, fight whatever is ahead of them and knock
//! down towers. A crystal in the middle lane rewards whoever hits it (or
//! whoever holds the ground around it). The match ends when a side has no
//! towers left.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  CLI: play (TUI) / sim / batch      │
//! ├─────────────────────────────────────┤
//! │  Session: input, frame clock,       │
//! │  progression store                  │
//! ├─────────────────────────────────────┤
//! │  MatchState::tick (simulation core) │
//! └─────────────────────────────────────┘
//! ```
//!
//! The core in [`game`] never touches a display or a clock; a host calls
//! [`MatchState::tick`] with a time step and reads a [`Snapshot`] back.
//!
//! ```
//! use lanecrystal::{MatchConfig, MatchState, Team};
//!
//! let mut state = MatchState::new(MatchConfig::default(), 7);
//! state.deploy(Team::Player, "scout", 0).unwrap();
//! state.tick(1.0 / 60.0);
//! assert_eq!(state.snapshot().units.len(), 1);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod game;
pub mod progress;
pub mod render;
pub mod session;

pub use config::MatchConfig;
pub use error::{ConfigError, DeployRejected, DeployResult, StoreError};

// Re-export key game types at crate root for convenience
pub use game::{
    Archetype, LaneId, MatchState, ObjectiveMode, Outcome, Progression, SimEvent, Snapshot, Team,
    UnitId,
};
pub use session::{FrameClock, Session};
