//! Core of an image-voting widget: a registry of votable items, a rotation
//! engine that picks which `k` items are on display each round under a
//! no-immediate-repeat rule, and a bounded voting session that tracks vote
//! and display tallies, exposes a persistable snapshot after every vote, and
//! emits a final tally plus chart dataset once the vote budget is spent.
//!
//! Rendering and persistence are the caller's job: after each
//! [`VotingSession::record_vote`] the outcome carries the round delta to
//! re-render, and [`VotingSession::snapshot`] yields the state to persist.

pub mod error;
pub mod models;
pub mod rotation;
pub mod session;
pub mod store;
pub mod tally;

pub use error::{Error, Result};
pub use models::{Item, SessionConfig, VoteRecord};
pub use rotation::{RotationEngine, RoundChange};
pub use session::{SessionState, VoteOutcome, VotingSession};
pub use store::{FileStore, ItemSnapshot, Snapshot};
pub use tally::{ChartData, TallyReport};
