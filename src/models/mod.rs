use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A votable item: identity plus the two cumulative counters.
///
/// Items are created once at session start (or restored from a snapshot) and
/// never destroyed during a session; the counters mutate only through the
/// voting session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub image_src: String,
    pub vote_tally: u32,
    pub times_displayed: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, image_src: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            image_src: image_src.into(),
            vote_tally: 0,
            times_displayed: 0,
        }
    }
}

/// Session configuration. Serde names match the option names the
/// presentation adapter already speaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(rename = "concurrentImageSetting")]
    pub concurrent_images: usize,
    #[serde(rename = "maxVotesAllowed")]
    pub max_votes_allowed: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            concurrent_images: 3,
            max_votes_allowed: 25,
        }
    }
}

/// One recorded vote, kept as part of the session's metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub item_id: String,
    pub timestamp: DateTime<Utc>,
}
