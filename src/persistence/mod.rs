//! Persistence layer: the removal history.
//!
//! Provides the [`HistoryStore`] trait for durable storage of archived
//! entries. [`postgres::PostgresHistoryStore`] uses `sqlx::PgPool`;
//! [`memory::MemoryHistoryStore`] keeps rows in process and is used when
//! persistence is disabled and in tests. Both enforce the natural-key
//! uniqueness and the newest-first ordering.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{HistoryPage, HistoryQuery, NewHistoryEvent, Region};
use crate::error::GatewayError;

pub use memory::MemoryHistoryStore;
pub use postgres::PostgresHistoryStore;

/// Append-only store of archived entries.
#[async_trait]
pub trait HistoryStore: Send + Sync + std::fmt::Debug {
    /// Inserts entries, skipping any whose natural key already exists.
    ///
    /// Returns the number of rows actually inserted.
    async fn insert_ignoring_duplicates(
        &self,
        entries: &[NewHistoryEvent],
    ) -> Result<u64, GatewayError>;

    /// Reads one page of a region's history plus the filtered total.
    async fn page(
        &self,
        region: Region,
        query: &HistoryQuery,
    ) -> Result<HistoryPage, GatewayError>;

    /// Counts the rows stored for a region.
    async fn count(&self, region: Region) -> Result<u64, GatewayError>;
}

/// Escapes `%`, `_` and `\` so `needle` matches literally inside `ILIKE`.
#[must_use]
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
