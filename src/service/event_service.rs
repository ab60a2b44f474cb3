//! Event service: fetch, reconcile, archive, notify.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{EventBus, EventKind, FeedEvent, Reconciliation, Region, SnapshotRegistry};
use crate::error::GatewayError;
use crate::fetch::{FetchOrchestrator, Fetched};

use super::HistoryService;

/// Orchestration layer for the current-events path.
///
/// Every successful fetch follows the pattern: fetch through the
/// orchestrator → advance the region's snapshot → archive what disappeared →
/// emit events → return the payload. Archival is best effort; its failure
/// is logged and never fails the fetch.
#[derive(Debug, Clone)]
pub struct EventService {
    orchestrator: FetchOrchestrator,
    snapshots: Arc<SnapshotRegistry>,
    history: HistoryService,
    event_bus: EventBus,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(
        orchestrator: FetchOrchestrator,
        snapshots: Arc<SnapshotRegistry>,
        history: HistoryService,
        event_bus: EventBus,
    ) -> Self {
        Self {
            orchestrator,
            snapshots,
            history,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`SnapshotRegistry`].
    #[must_use]
    pub fn snapshots(&self) -> &Arc<SnapshotRegistry> {
        &self.snapshots
    }

    /// Fetches the current payload of `region` and reconciles it with the
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] when every transport
    /// failed. Nothing is reconciled in that case.
    pub async fn current_events(&self, region: Region) -> Result<Fetched, GatewayError> {
        let fetched = self.orchestrator.fetch(region).await?;
        tracing::info!(
            %region,
            via = fetched.via,
            events = fetched.payload.events.len(),
            updates = fetched.payload.updates.len(),
            "events fetched"
        );

        let outcome = self
            .snapshots
            .advance(region, fetched.payload.clone())
            .await;
        self.apply(region, &outcome).await;

        Ok(fetched)
    }

    /// Archives removals and publishes notifications for one reconciliation.
    async fn apply(&self, region: Region, outcome: &Reconciliation) {
        if let Reconciliation::Seeded { discarded } = outcome {
            tracing::debug!(%region, ?discarded, "snapshot seeded");
            return;
        }

        for kind in EventKind::ALL {
            let added = outcome.added(kind);
            if !added.is_empty() {
                let _ = self.event_bus.publish(FeedEvent::EntriesAdded {
                    region,
                    kind,
                    titles: added.iter().map(|e| e.title.clone()).collect(),
                    timestamp: Utc::now(),
                });
            }

            let removed = outcome.removed(kind);
            if removed.is_empty() {
                continue;
            }
            match self.history.archive(region, kind, removed).await {
                Ok(inserted) => {
                    tracing::info!(%region, %kind, removed = removed.len(), inserted, "removed entries archived");
                    let _ = self.event_bus.publish(FeedEvent::EntriesArchived {
                        region,
                        kind,
                        titles: removed.iter().map(|e| e.title.clone()).collect(),
                        inserted,
                        timestamp: Utc::now(),
                    });
                }
                Err(err) => {
                    tracing::error!(%region, %kind, error = %err, "failed to archive removed entries");
                }
            }
        }
    }
}
