//! Host-facing session: the glue between a display loop and the match.
//!
//! A host owns one [`Session`], feeds it pointer taps or key presses, and
//! calls [`Session::frame`] once per rendered frame with the time step from
//! a [`FrameClock`].

use std::time::Instant;

use tracing::{info, warn};

use crate::config::MatchConfig;
use crate::error::{DeployRejected, DeployResult};
use crate::game::lane::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::game::{
    CATALOG, LaneId, Layout, MatchState, Outcome, SimEvent, Snapshot, Tap, Team, Viewport,
};
use crate::progress::ProgressStore;

/// Turns wall-clock instants into clamped frame deltas.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Option<Instant>,
    max_dt: f32,
}

impl FrameClock {
    /// Clock that never reports more than `max_dt` seconds per frame.
    #[must_use]
    pub const fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`.
    ///
    /// The first call returns zero.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = self
            .last
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last = Some(now);
        dt.clamp(0.0, self.max_dt)
    }
}

/// One player's session: a match, the selected lane and the progress store.
#[derive(Debug)]
pub struct Session<S> {
    state: MatchState,
    store: S,
    selected: LaneId,
    viewport: Viewport,
    last_rejection: Option<DeployRejected>,
}

impl<S: ProgressStore> Session<S> {
    /// Start a session, restoring progression from `store`.
    ///
    /// A store that cannot be read is logged and treated as empty.
    #[must_use]
    pub fn new(config: MatchConfig, seed: u64, store: S) -> Self {
        let mut state = MatchState::new(config, seed);
        match store.load() {
            Ok(Some(progression)) => {
                info!(wins = progression.wins, level = progression.level, "progression restored");
                state.set_progression(progression);
            }
            Ok(None) => {}
            Err(err) => warn!(%err, "could not load progression, starting fresh"),
        }
        Self {
            state,
            store,
            selected: LaneId::CONTESTED,
            viewport: Viewport::fit(LOGICAL_WIDTH, LOGICAL_HEIGHT),
            last_rejection: None,
        }
    }

    /// The match being played.
    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    /// Mutable access to the match, for hosts that script scenarios.
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    /// The progress store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Lane the next card will be deployed into.
    #[must_use]
    pub const fn selected_lane(&self) -> LaneId {
        self.selected
    }

    /// Why the most recent player deploy failed, cleared on success.
    #[must_use]
    pub const fn last_rejection(&self) -> Option<&DeployRejected> {
        self.last_rejection.as_ref()
    }

    /// Select a lane. Out-of-range indices are ignored.
    pub fn select_lane(&mut self, lane: usize) -> bool {
        match LaneId::new(lane) {
            Some(lane) => {
                self.selected = lane;
                true
            }
            None => false,
        }
    }

    /// Resize the pixel surface taps are mapped from.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::fit(width, height);
    }

    /// Deploy an archetype for the player into the selected lane.
    ///
    /// # Errors
    ///
    /// Returns the [`DeployRejected`] reason; the match is unchanged.
    pub fn deploy(&mut self, archetype: &str) -> DeployResult {
        let result = self
            .state
            .deploy(Team::Player, archetype, self.selected.index());
        self.last_rejection = result.as_ref().err().cloned();
        result
    }

    /// Deploy the card at `index` in card order.
    ///
    /// # Errors
    ///
    /// Returns [`DeployRejected::UnknownArchetype`] for an index past the
    /// last card, otherwise whatever [`Session::deploy`] returns.
    pub fn deploy_card(&mut self, index: usize) -> DeployResult {
        match CATALOG.get(index) {
            Some(archetype) => self.deploy(archetype.id),
            None => {
                let err = DeployRejected::UnknownArchetype(format!("card {index}"));
                self.last_rejection = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Handle a tap at pixel coordinates.
    ///
    /// Field taps select a lane. Card taps deploy while playing; once the
    /// match is over any tap on the card band restarts it.
    pub fn tap(&mut self, px: f32, py: f32) -> Tap {
        let (x, y) = self.viewport.to_logical(px, py);
        let tap = Layout::classify(x, y);
        match tap {
            Tap::Lane(lane) => self.selected = lane,
            Tap::Card(_) | Tap::CardStrip if !self.state.is_playing() => self.restart(),
            Tap::Card(index) => {
                let _ = self.deploy_card(index);
            }
            Tap::CardStrip | Tap::Outside => {}
        }
        tap
    }

    /// Start a new match, keeping progression.
    pub fn restart(&mut self) {
        self.state.restart();
        self.last_rejection = None;
    }

    /// Advance one frame. Persists progression when the player wins.
    pub fn frame(&mut self, dt: f32) -> &[SimEvent] {
        let won = self
            .state
            .tick(dt)
            .iter()
            .any(|e| matches!(e, SimEvent::MatchEnded { outcome: Outcome::Victory }));
        if won {
            let progression = self.state.progression();
            if let Err(err) = self.store.save(&progression) {
                warn!(%err, "could not save progression");
            }
        }
        self.state.events()
    }

    /// Read-only view for drawing.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }
}
