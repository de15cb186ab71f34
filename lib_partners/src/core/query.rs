//! Read-only access to the joined list for the REST layer.

use super::cache::JoinedCache;
use crate::directory::PartnerSolution;
use std::sync::Arc;

/// One page of partners plus the size of the (possibly filtered) list it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    pub items: Vec<PartnerSolution>,
    pub total_matching: usize,
}

#[derive(Debug, Clone)]
pub struct QueryService {
    cache: Arc<JoinedCache>,
}

impl QueryService {
    pub fn new(cache: Arc<JoinedCache>) -> Self {
        Self { cache }
    }

    /// Copy of the whole current list.
    pub fn get_all(&self) -> Vec<PartnerSolution> {
        self.cache.snapshot().entries.clone()
    }

    /// Cuts `[offset, offset + limit)` from the current list, optionally restricted
    /// to partners that have solutions. An offset past the end yields an empty page,
    /// never an error.
    pub fn get_page(&self, offset: usize, limit: usize, has_solutions_only: bool) -> PageSlice {
        let snapshot = self.cache.snapshot();
        let matching: Vec<&PartnerSolution> = snapshot
            .entries
            .iter()
            .filter(|p| !has_solutions_only || p.has_solutions())
            .collect();

        let total_matching = matching.len();
        let end = offset.saturating_add(limit).min(total_matching);
        let items = if offset >= total_matching {
            Vec::new()
        } else {
            matching[offset..end].iter().map(|p| (*p).clone()).collect()
        };

        PageSlice {
            items,
            total_matching,
        }
    }
}
