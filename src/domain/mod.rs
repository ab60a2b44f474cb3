//! Domain layer: regions, upstream events, archive records, snapshot
//! comparison and the notification bus.

pub mod event;
pub mod event_bus;
pub mod feed_event;
pub mod history;
pub mod region;
pub mod snapshot;
pub mod snapshot_registry;

pub use event::{Event, EventKey, EventKind, EventStatus, EventsPayload};
pub use event_bus::EventBus;
pub use feed_event::FeedEvent;
pub use history::{HistoryEvent, HistoryPage, HistoryQuery, HistoryTypeFilter, NewHistoryEvent};
pub use region::Region;
pub use snapshot::{
    Reconciliation, SnapshotDiff, SnapshotState, detect_added_events, detect_removed_events,
};
pub use snapshot_registry::SnapshotRegistry;
