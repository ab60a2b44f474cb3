//! In-process history store.
//!
//! Rows are kept in insertion order behind a [`tokio::sync::RwLock`]. Rows
//! archived in the same instant are ordered newest insertion first, which
//! keeps pagination stable.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::HistoryStore;
use crate::domain::{HistoryEvent, HistoryPage, HistoryQuery, NewHistoryEvent, Region};
use crate::error::GatewayError;

/// History store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    rows: RwLock<Vec<HistoryEvent>>,
}

impl MemoryHistoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn insert_ignoring_duplicates(
        &self,
        entries: &[NewHistoryEvent],
    ) -> Result<u64, GatewayError> {
        let mut rows = self.rows.write().await;
        let removed_at = Utc::now();
        let mut inserted = 0;
        for entry in entries {
            let exists = rows.iter().any(|r| {
                (
                    r.region,
                    r.title.as_str(),
                    r.banner.as_str(),
                    r.start_date.as_str(),
                    r.end_date.as_str(),
                ) == entry.natural_key()
            });
            if !exists {
                rows.push(HistoryEvent::from_new(entry.clone(), removed_at));
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn page(
        &self,
        region: Region,
        query: &HistoryQuery,
    ) -> Result<HistoryPage, GatewayError> {
        let rows = self.rows.read().await;
        let mut matching: Vec<(usize, &HistoryEvent)> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.region == region && query.matches(r))
            .collect();
        matching.sort_by(|(ia, a), (ib, b)| b.removed_at.cmp(&a.removed_at).then(ib.cmp(ia)));

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let data = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.page_size).unwrap_or(usize::MAX))
            .map(|(_, r)| r.clone())
            .collect();
        Ok(HistoryPage::new(data, query, total))
    }

    async fn count(&self, region: Region) -> Result<u64, GatewayError> {
        let rows = self.rows.read().await;
        let count = rows.iter().filter(|r| r.region == region).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
