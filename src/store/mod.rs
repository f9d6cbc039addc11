//! Snapshot persistence. Stands in for the browser's local storage: a single
//! JSON document written after every vote and read back at startup.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Serializable session state. Field names are camelCase on the wire; this is
/// the one format shared with the presentation adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub items: Vec<ItemSnapshot>,
    pub total_votes_used: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub name: String,
    pub image_src: String,
    pub vote_tally: u32,
    pub times_displayed: u32,
}

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted snapshot. A missing file means no prior session
    /// state and is not an error.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            debug!("no snapshot at {}", self.path.display());
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        info!(
            "restored snapshot from {} ({} item(s), {} vote(s) used)",
            self.path.display(),
            snapshot.items.len(),
            snapshot.total_votes_used
        );
        Ok(Some(snapshot))
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let raw = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, raw)?;
        debug!("saved snapshot to {}", self.path.display());
        Ok(())
    }
}
