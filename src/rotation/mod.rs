//! Rotation engine: decides which subset of items is on display each round.
//!
//! Items move between three disjoint pools — queued, displayed, post-display —
//! and every item is in exactly one of them at rest. A fourth list,
//! `previous_display`, is a non-owning snapshot of the last round used only
//! for the no-immediate-repeat check.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

// Backstop for the rejection-sampling loop. Once a single refresh has thrown
// back this many repeat picks, further repeats are accepted rather than
// re-rolled.
const MAX_REJECTIONS_PER_REFRESH: usize = 1024;

/// What changed in one round, for the presentation adapter: the new display
/// sequence, and the items that left the display since the previous round.
#[derive(Debug, Clone)]
pub struct RoundChange {
    pub displayed: Vec<String>,
    pub removed: Vec<String>,
}

#[derive(Debug)]
pub struct RotationEngine {
    concurrent: usize,
    queued: Vec<String>,
    displayed: Vec<String>,
    post_display: Vec<String>,
    previous_display: Vec<String>,
    rng: StdRng,
}

impl RotationEngine {
    /// Builds an engine over the given item ids. All ids start queued;
    /// nothing is displayed until the first [`refresh`](Self::refresh).
    pub fn new(item_ids: Vec<String>, concurrent: usize) -> Result<Self> {
        Self::with_rng(item_ids, concurrent, StdRng::from_os_rng())
    }

    /// Like [`new`](Self::new) but with a caller-provided RNG, so rotation
    /// outcomes can be made deterministic.
    pub fn with_rng(item_ids: Vec<String>, concurrent: usize, rng: StdRng) -> Result<Self> {
        if item_ids.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        if concurrent == 0 || concurrent > item_ids.len() {
            return Err(Error::InvalidConcurrency {
                requested: concurrent,
                available: item_ids.len(),
            });
        }
        Ok(Self {
            concurrent,
            queued: item_ids,
            displayed: Vec::new(),
            post_display: Vec::new(),
            previous_display: Vec::new(),
            rng,
        })
    }

    /// The items currently on display, in render order.
    pub fn displayed(&self) -> &[String] {
        &self.displayed
    }

    /// Retires the current display and selects a fresh set of `concurrent`
    /// items at random, avoiding items shown in the immediately preceding
    /// round whenever some non-repeating candidate is still reachable.
    pub fn refresh(&mut self) -> RoundChange {
        // Retire: everything on display moves to the post-display pool, and
        // the retiring set becomes the no-repeat reference.
        self.previous_display = std::mem::take(&mut self.displayed);
        self.post_display.extend(self.previous_display.iter().cloned());

        let mut rejections = 0;
        while self.displayed.len() < self.concurrent {
            if self.queued.is_empty() {
                self.refill_queue();
            }
            let index = self.rng.random_range(0..self.queued.len());
            let picked = self.queued.swap_remove(index);

            if self.was_displayed_last_round(&picked)
                && rejections < MAX_REJECTIONS_PER_REFRESH
                && self.fresh_candidate_remains()
            {
                // Repeat from last round while a fresh candidate still
                // exists: throw it back and re-roll.
                self.queued.push(picked);
                rejections += 1;
                continue;
            }
            if self.was_displayed_last_round(&picked) {
                debug!("accepting repeat item {picked}: no non-repeating candidate left");
            }
            self.displayed.push(picked);
        }

        if rejections >= MAX_REJECTIONS_PER_REFRESH {
            warn!("rotation hit the rejection cap ({MAX_REJECTIONS_PER_REFRESH}); allowed repeats through");
        }

        let removed = self
            .previous_display
            .iter()
            .filter(|id| !self.displayed.contains(id))
            .cloned()
            .collect();
        RoundChange {
            displayed: self.displayed.clone(),
            removed,
        }
    }

    // Queue ran dry: recycle every post-display item. Order is irrelevant,
    // selection is random anyway.
    fn refill_queue(&mut self) {
        debug!("queue empty, recycling {} post-display item(s)", self.post_display.len());
        self.queued.append(&mut self.post_display);
    }

    fn was_displayed_last_round(&self, id: &str) -> bool {
        self.previous_display.iter().any(|p| p == id)
    }

    // True if any still-selectable item (queued now, or recyclable from the
    // post-display pool) was not part of the previous round. When this goes
    // false the no-repeat rule is unsatisfiable and repeats must be accepted.
    fn fresh_candidate_remains(&self) -> bool {
        self.queued
            .iter()
            .chain(self.post_display.iter())
            .any(|id| !self.was_displayed_last_round(id))
    }

    #[cfg(test)]
    fn pool_sizes(&self) -> (usize, usize, usize) {
        (self.queued.len(), self.displayed.len(), self.post_display.len())
    }

    #[cfg(test)]
    fn all_pooled_ids(&self) -> Vec<String> {
        self.queued
            .iter()
            .chain(self.displayed.iter())
            .chain(self.post_display.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item-{i}")).collect()
    }

    fn engine(n: usize, k: usize, seed: u64) -> RotationEngine {
        RotationEngine::with_rng(ids(n), k, StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn refresh_fills_display_to_concurrency() {
        let mut engine = engine(7, 3, 1);
        for _ in 0..50 {
            engine.refresh();
            assert_eq!(engine.displayed().len(), 3);
        }
    }

    #[test]
    fn pools_stay_disjoint_and_cover_all_items() {
        let mut engine = engine(7, 3, 2);
        for _ in 0..50 {
            engine.refresh();
            let pooled = engine.all_pooled_ids();
            let unique: HashSet<_> = pooled.iter().collect();
            assert_eq!(pooled.len(), 7, "an item left the pools");
            assert_eq!(unique.len(), 7, "an item is in two pools at once");
        }
    }

    #[test]
    fn display_has_no_duplicates_within_a_round() {
        let mut engine = engine(5, 3, 3);
        for _ in 0..50 {
            engine.refresh();
            let unique: HashSet<_> = engine.displayed().iter().collect();
            assert_eq!(unique.len(), engine.displayed().len());
        }
    }

    #[test]
    fn no_item_repeats_across_rounds_when_pool_is_large_enough() {
        // 7 items, k = 3: a fully fresh display always exists.
        let mut engine = engine(7, 3, 4);
        engine.refresh();
        for _ in 0..100 {
            let before: HashSet<String> = engine.displayed().iter().cloned().collect();
            engine.refresh();
            for id in engine.displayed() {
                assert!(!before.contains(id), "{id} repeated across rounds");
            }
        }
    }

    #[test]
    fn starved_pool_reuses_a_previous_item_instead_of_hanging() {
        // 5 items, k = 3: only two items sit outside the previous round, so
        // every refresh must accept exactly one repeat.
        let mut engine = engine(5, 3, 5);
        engine.refresh();
        for _ in 0..20 {
            let before: HashSet<String> = engine.displayed().iter().cloned().collect();
            engine.refresh();
            let fresh = engine
                .displayed()
                .iter()
                .filter(|id| !before.contains(*id))
                .count();
            assert_eq!(fresh, 2, "both items outside the last round must be shown");
            assert_eq!(engine.displayed().len(), 3);
        }
    }

    #[test]
    fn retired_items_land_in_post_display() {
        let mut engine = engine(9, 3, 6);
        engine.refresh();
        engine.refresh();
        let (queued, displayed, post) = engine.pool_sizes();
        assert_eq!(displayed, 3);
        assert_eq!(queued + post, 6);
        assert!(post >= 3, "last round's items should be post-display");
    }

    #[test]
    fn round_change_reports_items_removed_from_view() {
        let mut engine = engine(7, 3, 7);
        engine.refresh();
        let before: HashSet<String> = engine.displayed().iter().cloned().collect();
        let change = engine.refresh();
        let removed: HashSet<String> = change.removed.iter().cloned().collect();
        assert_eq!(removed, before, "everything shown last round was replaced");
        assert_eq!(change.displayed, engine.displayed());
    }

    #[test]
    fn concurrency_above_item_count_is_a_config_error() {
        let err = RotationEngine::new(ids(2), 3).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConcurrency { requested: 3, available: 2 }
        ));
    }

    #[test]
    fn zero_concurrency_is_a_config_error() {
        assert!(RotationEngine::new(ids(4), 0).is_err());
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(matches!(
            RotationEngine::new(Vec::new(), 3).unwrap_err(),
            Error::EmptyRegistry
        ));
    }
}
