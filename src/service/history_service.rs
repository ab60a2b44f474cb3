//! History service: archival of removed entries and the read path.

use std::sync::Arc;

use crate::domain::{Event, EventKind, HistoryPage, HistoryQuery, NewHistoryEvent, Region};
use crate::error::GatewayError;
use crate::persistence::HistoryStore;

/// Front of the [`HistoryStore`] with the error policy of each path.
///
/// Writes report their errors to the caller, which decides whether they
/// matter. Reads never fail: a store error degrades to an empty page.
#[derive(Debug, Clone)]
pub struct HistoryService {
    store: Arc<dyn HistoryStore>,
}

impl HistoryService {
    /// Creates a new `HistoryService`.
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Archives entries that disappeared from `region`'s `kind` list.
    ///
    /// Idempotent: entries already archived are skipped. Returns the number
    /// of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the store rejects the
    /// write.
    pub async fn archive(
        &self,
        region: Region,
        kind: EventKind,
        removed: &[Event],
    ) -> Result<u64, GatewayError> {
        if removed.is_empty() {
            return Ok(0);
        }
        let entries: Vec<NewHistoryEvent> = removed
            .iter()
            .map(|e| NewHistoryEvent::from_event(e, region, kind))
            .collect();
        self.store.insert_ignoring_duplicates(&entries).await
    }

    /// Reads one page of a region's history.
    ///
    /// Store failures are logged and served as an empty page.
    pub async fn page(&self, region: Region, query: &HistoryQuery) -> HistoryPage {
        match self.store.page(region, query).await {
            Ok(page) => page,
            Err(err) => {
                tracing::error!(%region, error = %err, "history read failed, serving empty page");
                HistoryPage::empty(query)
            }
        }
    }
}
