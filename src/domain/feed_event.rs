//! Notifications emitted after each reconciliation.
//!
//! Every reconciliation that finds changes publishes [`FeedEvent`]s through
//! the [`super::EventBus`]. They are forwarded to WebSocket clients that
//! subscribed to the event's region.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EventKind, Region};

/// Notification about a change in a region's feed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// Emitted when entries disappeared upstream and were archived.
    EntriesArchived {
        /// Region the entries disappeared from.
        region: Region,
        /// List the entries came from.
        kind: EventKind,
        /// Titles of the removed entries.
        titles: Vec<String>,
        /// Rows actually inserted; duplicates are not counted.
        inserted: u64,
        /// Detection timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when entries appeared upstream since the last fetch.
    EntriesAdded {
        /// Region the entries appeared in.
        region: Region,
        /// List the entries belong to.
        kind: EventKind,
        /// Titles of the new entries.
        titles: Vec<String>,
        /// Detection timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl FeedEvent {
    /// Returns the region associated with this event.
    #[must_use]
    pub const fn region(&self) -> Region {
        match self {
            Self::EntriesArchived { region, .. } | Self::EntriesAdded { region, .. } => *region,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EntriesArchived { .. } => "entries_archived",
            Self::EntriesAdded { .. } => "entries_added",
        }
    }
}
