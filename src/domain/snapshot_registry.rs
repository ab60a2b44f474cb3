//! Per-region snapshot storage.
//!
//! [`SnapshotRegistry`] keeps one [`SnapshotState`] per [`Region`]. The whole
//! map sits behind a single [`tokio::sync::RwLock`]; advancing a region takes
//! the write lock so two concurrent fetches of the same region are compared
//! one after the other instead of both against the same baseline.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{EventsPayload, Reconciliation, Region, SnapshotState};

/// Last accepted payload of every region fetched so far.
#[derive(Debug, Default)]
pub struct SnapshotRegistry {
    states: RwLock<HashMap<Region, SnapshotState>>,
}

impl SnapshotRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a freshly fetched payload and returns what changed.
    pub async fn advance(&self, region: Region, payload: EventsPayload) -> Reconciliation {
        let mut map = self.states.write().await;
        let state = map.remove(&region).unwrap_or_default();
        let (next, outcome) = state.advance(region, payload);
        map.insert(region, next);
        outcome
    }

    /// Drops the snapshot of a region; its next fetch only seeds.
    pub async fn reset(&self, region: Region) -> bool {
        self.states.write().await.remove(&region).is_some()
    }

    /// Returns the retained payload of a region.
    pub async fn get(&self, region: Region) -> Option<EventsPayload> {
        self.states
            .read()
            .await
            .get(&region)
            .and_then(SnapshotState::payload)
            .cloned()
    }

    /// Returns the number of regions with a snapshot.
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    /// Returns `true` if no region has been fetched yet.
    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}
