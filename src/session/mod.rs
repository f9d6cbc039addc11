//! Voting session: bounded vote budget over a rotating display.
//!
//! Owns the item registry and the rotation engine; all counter mutation goes
//! through [`VotingSession::record_vote`].

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::models::{Item, SessionConfig, VoteRecord};
use crate::rotation::{RotationEngine, RoundChange};
use crate::store::{ItemSnapshot, Snapshot};
use crate::tally::TallyReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// Terminal: the vote budget is spent and further votes are ignored.
    Exhausted,
}

/// What a `record_vote` call did.
#[derive(Debug)]
pub enum VoteOutcome {
    /// Exhausted session or a target not on display. No state changed.
    Ignored,
    /// Vote counted and a new round rotated in.
    Recorded(RoundChange),
    /// This vote spent the last of the budget. Emitted exactly once.
    Exhausted(TallyReport),
}

pub struct VotingSession {
    config: SessionConfig,
    items: Vec<Item>,
    engine: RotationEngine,
    total_votes_used: u32,
    state: SessionState,
    history: Vec<VoteRecord>,
    started_at: DateTime<Utc>,
}

impl VotingSession {
    /// Starts a fresh session over `items` and rotates in the first display
    /// round.
    pub fn new(config: SessionConfig, items: Vec<Item>) -> Result<Self> {
        Self::build(config, items, 0, StdRng::from_os_rng())
    }

    /// Like [`new`](Self::new) with a caller-provided RNG for deterministic
    /// rotation.
    pub fn with_rng(config: SessionConfig, items: Vec<Item>, rng: StdRng) -> Result<Self> {
        Self::build(config, items, 0, rng)
    }

    /// Rebuilds a session from a persisted snapshot instead of defaults. A
    /// snapshot already at or past the vote budget restores straight into
    /// the exhausted state.
    pub fn from_snapshot(config: SessionConfig, snapshot: Snapshot) -> Result<Self> {
        let items = snapshot
            .items
            .into_iter()
            .map(|saved| {
                let mut item = Item::new(saved.name, saved.image_src);
                item.vote_tally = saved.vote_tally;
                item.times_displayed = saved.times_displayed;
                item
            })
            .collect();
        Self::build(config, items, snapshot.total_votes_used, StdRng::from_os_rng())
    }

    fn build(
        config: SessionConfig,
        items: Vec<Item>,
        total_votes_used: u32,
        rng: StdRng,
    ) -> Result<Self> {
        let ids = items.iter().map(|item| item.id.clone()).collect();
        let mut engine = RotationEngine::with_rng(ids, config.concurrent_images, rng)?;

        let state = if total_votes_used >= config.max_votes_allowed {
            SessionState::Exhausted
        } else {
            // First round goes up immediately.
            engine.refresh();
            SessionState::Active
        };

        Ok(Self {
            config,
            items,
            engine,
            total_votes_used,
            state,
            history: Vec::new(),
            started_at: Utc::now(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn total_votes_used(&self) -> u32 {
        self.total_votes_used
    }

    pub fn votes_remaining(&self) -> u32 {
        self.config.max_votes_allowed.saturating_sub(self.total_votes_used)
    }

    /// The full registry, for tally rendering once the session is over.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn history(&self) -> &[VoteRecord] {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Items currently on display, in render order.
    pub fn displayed_items(&self) -> Vec<&Item> {
        self.engine
            .displayed()
            .iter()
            .filter_map(|id| self.items.iter().find(|item| &item.id == id))
            .collect()
    }

    /// Serializable state for the persistence collaborator, refreshed after
    /// every recorded vote.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            items: self
                .items
                .iter()
                .map(|item| ItemSnapshot {
                    name: item.name.clone(),
                    image_src: item.image_src.clone(),
                    vote_tally: item.vote_tally,
                    times_displayed: item.times_displayed,
                })
                .collect(),
            total_votes_used: self.total_votes_used,
        }
    }

    pub fn report(&self) -> TallyReport {
        TallyReport::from_items(&self.items)
    }

    /// Records a vote for the displayed item with id `item_id`.
    ///
    /// Every item on display gets its display counter bumped; the selected
    /// item alone gets its vote tally bumped. The display then rotates and
    /// the vote budget is charged. Votes against an exhausted session, or
    /// for a target that is not currently displayed, are ignored without
    /// touching any state.
    pub fn record_vote(&mut self, item_id: &str) -> VoteOutcome {
        if self.state == SessionState::Exhausted {
            debug!("vote after exhaustion ignored");
            return VoteOutcome::Ignored;
        }
        let displayed: Vec<String> = self.engine.displayed().to_vec();
        if !displayed.iter().any(|id| id == item_id) {
            warn!("vote target {item_id} is not on display, ignoring");
            return VoteOutcome::Ignored;
        }

        for item in &mut self.items {
            if displayed.contains(&item.id) {
                item.times_displayed += 1;
                if item.id == item_id {
                    item.vote_tally += 1;
                }
            }
        }
        self.history.push(VoteRecord {
            item_id: item_id.to_string(),
            timestamp: Utc::now(),
        });

        let change = self.engine.refresh();
        self.total_votes_used += 1;
        info!(
            "vote {}/{} recorded for {item_id}",
            self.total_votes_used, self.config.max_votes_allowed
        );

        if self.total_votes_used >= self.config.max_votes_allowed {
            self.state = SessionState::Exhausted;
            info!("vote budget spent, session exhausted");
            return VoteOutcome::Exhausted(self.report());
        }
        VoteOutcome::Recorded(change)
    }
}
