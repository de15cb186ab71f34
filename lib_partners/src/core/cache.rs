//! Lock-free holder for the current joined list.
//!
//! Readers load an `Arc<Snapshot>` and keep it for as long as they like; a publish
//! swaps in a whole new snapshot, so nobody ever sees a half-written list.

use crate::directory::PartnerSolution;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One published generation of the joined list.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub entries: Vec<PartnerSolution>,
    /// `None` until the first publish.
    pub published_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_loaded(&self) -> bool {
        self.published_at.is_some()
    }
}

#[derive(Debug, Default)]
pub struct JoinedCache {
    slot: ArcSwap<Snapshot>,
}

impl JoinedCache {
    /// An empty, never-published cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list in one pointer swap.
    pub fn publish(&self, entries: Vec<PartnerSolution>) {
        self.slot.store(Arc::new(Snapshot {
            entries,
            published_at: Some(Utc::now()),
        }));
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.slot.load_full()
    }

    pub fn len(&self) -> usize {
        self.slot.load().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partner(name: &str) -> PartnerSolution {
        PartnerSolution {
            partner_name: Some(name.to_string()),
            partner_id: None,
            partner_level: None,
            partner_type: None,
            short_description: None,
            company_overview: None,
            solutions: Vec::new(),
        }
    }

    #[test]
    fn starts_empty_and_unloaded() {
        let cache = JoinedCache::new();
        let snapshot = cache.snapshot();
        assert!(snapshot.entries.is_empty());
        assert!(!snapshot.is_loaded());
        assert!(cache.is_empty());
    }

    #[test]
    fn publish_replaces_whole_list() {
        let cache = JoinedCache::new();
        cache.publish(vec![partner("A"), partner("B")]);
        cache.publish(vec![partner("C")]);

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.entries, vec![partner("C")]);
        assert!(snapshot.is_loaded());
    }

    #[test]
    fn held_snapshot_survives_a_publish() {
        let cache = JoinedCache::new();
        cache.publish(vec![partner("old")]);
        let held = cache.snapshot();

        cache.publish(vec![partner("new"), partner("newer")]);

        assert_eq!(held.entries, vec![partner("old")]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn empty_publish_still_marks_loaded() {
        let cache = JoinedCache::new();
        cache.publish(Vec::new());
        assert!(cache.snapshot().is_loaded());
        assert!(cache.is_empty());
    }
}
