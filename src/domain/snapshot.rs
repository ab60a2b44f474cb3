//! Snapshot comparison between two fetches of the same region.
//!
//! [`SnapshotState`] is plain data owned by whoever drives the fetches. Each
//! successful fetch is fed through [`SnapshotState::advance`], which returns
//! the next state together with what changed. A state captured for another
//! region is discarded before comparing, so entries never leak across
//! regions.

use std::collections::HashSet;

use super::{Event, EventKind, EventsPayload, Region};

/// Entries of `previous` whose identity key is absent from `current`.
///
/// Order of `previous` is preserved.
#[must_use]
pub fn detect_removed_events(current: &[Event], previous: &[Event]) -> Vec<Event> {
    let current_keys: HashSet<_> = current.iter().map(Event::key).collect();
    previous
        .iter()
        .filter(|e| !current_keys.contains(&e.key()))
        .cloned()
        .collect()
}

/// Entries of `current` whose identity key is absent from `previous`.
#[must_use]
pub fn detect_added_events(current: &[Event], previous: &[Event]) -> Vec<Event> {
    detect_removed_events(previous, current)
}

/// Last accepted payload, tagged with the region it was fetched for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotState {
    snapshot: Option<(Region, EventsPayload)>,
}

impl SnapshotState {
    /// An empty state: the next fetch only seeds it.
    #[must_use]
    pub const fn new() -> Self {
        Self { snapshot: None }
    }

    /// Region of the retained snapshot, if any.
    #[must_use]
    pub fn region(&self) -> Option<Region> {
        self.snapshot.as_ref().map(|(r, _)| *r)
    }

    /// Retained payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&EventsPayload> {
        self.snapshot.as_ref().map(|(_, p)| p)
    }

    /// Feeds the payload fetched for `region` and returns the next state.
    ///
    /// Seeds without comparing when the state is empty or was captured for a
    /// different region.
    #[must_use]
    pub fn advance(self, region: Region, current: EventsPayload) -> (Self, Reconciliation) {
        let reconciliation = match self.snapshot {
            Some((previous_region, ref previous)) if previous_region == region => {
                Reconciliation::Compared(SnapshotDiff::between(previous, &current))
            }
            Some((previous_region, _)) => Reconciliation::Seeded {
                discarded: Some(previous_region),
            },
            None => Reconciliation::Seeded { discarded: None },
        };
        let next = Self {
            snapshot: Some((region, current)),
        };
        (next, reconciliation)
    }
}

/// Outcome of feeding one payload into a [`SnapshotState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No comparison was made; the payload became the first snapshot.
    Seeded {
        /// Region of a snapshot that was dropped on region change.
        discarded: Option<Region>,
    },
    /// The payload was compared with the previous snapshot.
    Compared(SnapshotDiff),
}

impl Reconciliation {
    /// Removed entries, empty when seeded.
    #[must_use]
    pub fn removed(&self, kind: EventKind) -> &[Event] {
        match self {
            Self::Seeded { .. } => &[],
            Self::Compared(diff) => diff.removed(kind),
        }
    }

    /// Added entries, empty when seeded.
    #[must_use]
    pub fn added(&self, kind: EventKind) -> &[Event] {
        match self {
            Self::Seeded { .. } => &[],
            Self::Compared(diff) => diff.added(kind),
        }
    }
}

/// Per-list changes between two payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Events that disappeared.
    pub removed_events: Vec<Event>,
    /// Updates that disappeared.
    pub removed_updates: Vec<Event>,
    /// Events that appeared.
    pub added_events: Vec<Event>,
    /// Updates that appeared.
    pub added_updates: Vec<Event>,
}

impl SnapshotDiff {
    /// Compares two payloads list by list.
    #[must_use]
    pub fn between(previous: &EventsPayload, current: &EventsPayload) -> Self {
        Self {
            removed_events: detect_removed_events(&current.events, &previous.events),
            removed_updates: detect_removed_events(&current.updates, &previous.updates),
            added_events: detect_added_events(&current.events, &previous.events),
            added_updates: detect_added_events(&current.updates, &previous.updates),
        }
    }

    /// Removed entries of one kind.
    #[must_use]
    pub fn removed(&self, kind: EventKind) -> &[Event] {
        match kind {
            EventKind::Event => &self.removed_events,
            EventKind::Update => &self.removed_updates,
        }
    }

    /// Added entries of one kind.
    #[must_use]
    pub fn added(&self, kind: EventKind) -> &[Event] {
        match kind {
            EventKind::Event => &self.added_events,
            EventKind::Update => &self.added_updates,
        }
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed_events.is_empty()
            && self.removed_updates.is_empty()
            && self.added_events.is_empty()
            && self.added_updates.is_empty()
    }
}
