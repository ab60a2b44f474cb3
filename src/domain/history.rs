//! Archived events and the paginated read model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Event, EventKind, Region};

/// Default page size of the history view.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// An entry about to be archived.
///
/// The natural key `(region, title, banner, start_date, end_date)` is unique
/// in storage; inserting an existing key is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEvent {
    /// Region the entry disappeared from.
    pub region: Region,
    /// Upstream `Title`.
    pub title: String,
    /// Upstream `Banner`.
    pub banner: String,
    /// Upstream `Start`.
    pub start_date: String,
    /// Upstream `End`.
    pub end_date: String,
    /// Upstream `Details`, if any.
    pub details: Option<String>,
    /// Upstream `link`, if any.
    pub link: Option<String>,
    /// List the entry came from.
    pub event_type: EventKind,
}

impl NewHistoryEvent {
    /// Builds an archive record from a removed upstream entry.
    #[must_use]
    pub fn from_event(event: &Event, region: Region, event_type: EventKind) -> Self {
        Self {
            region,
            title: event.title.clone(),
            banner: event.banner.clone(),
            start_date: event.start.clone(),
            end_date: event.end.clone(),
            details: event.details.clone().filter(|d| !d.is_empty()),
            link: event.link.clone().filter(|l| !l.is_empty()),
            event_type,
        }
    }

    /// Natural key tuple used for conflict detection.
    #[must_use]
    pub fn natural_key(&self) -> (Region, &str, &str, &str, &str) {
        (
            self.region,
            &self.title,
            &self.banner,
            &self.start_date,
            &self.end_date,
        )
    }
}

/// A stored archive row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEvent {
    /// Generated identifier.
    pub id: Uuid,
    /// Region code.
    pub region: Region,
    /// Event title.
    pub title: String,
    /// Banner image URL.
    pub banner: String,
    /// Start of the display window.
    pub start_date: String,
    /// End of the display window.
    pub end_date: String,
    /// Optional description.
    pub details: Option<String>,
    /// Optional external link.
    pub link: Option<String>,
    /// `"event"` or `"update"`.
    pub event_type: EventKind,
    /// When the entry was archived.
    pub removed_at: DateTime<Utc>,
}

impl HistoryEvent {
    /// Materializes a new record as it would be stored at `removed_at`.
    #[must_use]
    pub fn from_new(new: NewHistoryEvent, removed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            region: new.region,
            title: new.title,
            banner: new.banner,
            start_date: new.start_date,
            end_date: new.end_date,
            details: new.details,
            link: new.link,
            event_type: new.event_type,
            removed_at,
        }
    }
}

/// Type filter of the history view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryTypeFilter {
    /// No filtering.
    #[default]
    All,
    /// Only `event` rows.
    Event,
    /// Only `update` rows.
    Update,
}

impl HistoryTypeFilter {
    /// The kind to filter on, if any.
    #[must_use]
    pub const fn kind(self) -> Option<EventKind> {
        match self {
            Self::All => None,
            Self::Event => Some(EventKind::Event),
            Self::Update => Some(EventKind::Update),
        }
    }
}

/// Normalized history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page, within `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
    /// Case-insensitive title substring; `None` when blank.
    pub search: Option<String>,
    /// Type filter.
    pub event_type: HistoryTypeFilter,
}

impl HistoryQuery {
    /// Builds a query, clamping page bounds and dropping a blank search.
    #[must_use]
    pub fn new(
        page: u32,
        page_size: u32,
        search: Option<&str>,
        event_type: HistoryTypeFilter,
    ) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            event_type,
        }
    }

    /// Number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns `true` if `row` passes the search and type filters.
    #[must_use]
    pub fn matches(&self, row: &HistoryEvent) -> bool {
        if let Some(kind) = self.event_type.kind()
            && row.event_type != kind
        {
            return false;
        }
        match &self.search {
            Some(needle) => row.title.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, None, HistoryTypeFilter::All)
    }
}

/// One page of archived rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HistoryPage {
    /// Rows on this page, newest archival first.
    pub data: Vec<HistoryEvent>,
    /// Page number served.
    pub page: u32,
    /// Page size used.
    pub page_size: u32,
    /// Rows matching the filters across all pages.
    pub total: u64,
    /// `ceil(total / page_size)`, zero when there are no rows.
    pub total_pages: u64,
}

impl HistoryPage {
    /// Assembles a page, computing `total_pages`.
    #[must_use]
    pub fn new(data: Vec<HistoryEvent>, query: &HistoryQuery, total: u64) -> Self {
        Self {
            data,
            page: query.page,
            page_size: query.page_size,
            total,
            total_pages: total.div_ceil(u64::from(query.page_size)),
        }
    }

    /// The degraded page served when the store cannot be read.
    #[must_use]
    pub fn empty(query: &HistoryQuery) -> Self {
        Self::new(Vec::new(), query, 0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn row(title: &str, kind: EventKind) -> HistoryEvent {
        HistoryEvent {
            id: Uuid::new_v4(),
            region: Region::Sg,
            title: title.to_string(),
            banner: "b".to_string(),
            start_date: "s".to_string(),
            end_date: "e".to_string(),
            details: None,
            link: None,
            event_type: kind,
            removed_at: Utc::now(),
        }
    }

    #[test]
    fn query_clamps_bounds() {
        let q = HistoryQuery::new(0, 0, None, HistoryTypeFilter::All);
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 1);

        let q = HistoryQuery::new(3, 1000, None, HistoryTypeFilter::All);
        assert_eq!(q.page_size, MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 200);
    }

    #[test]
    fn blank_search_is_dropped() {
        let q = HistoryQuery::new(1, 12, Some("   "), HistoryTypeFilter::All);
        assert!(q.search.is_none());
    }

    #[test]
    fn matches_search_case_insensitively() {
        let q = HistoryQuery::new(1, 12, Some("booYAH"), HistoryTypeFilter::All);
        assert!(q.matches(&row("BooyahFever", EventKind::Event)));
        assert!(!q.matches(&row("Evo Store", EventKind::Event)));
    }

    #[test]
    fn matches_type_filter() {
        let q = HistoryQuery::new(1, 12, None, HistoryTypeFilter::Update);
        assert!(q.matches(&row("x", EventKind::Update)));
        assert!(!q.matches(&row("x", EventKind::Event)));
    }

    #[test]
    fn total_pages_rounds_up() {
        let q = HistoryQuery::new(2, 12, None, HistoryTypeFilter::All);
        assert_eq!(HistoryPage::new(Vec::new(), &q, 25).total_pages, 3);
        assert_eq!(HistoryPage::new(Vec::new(), &q, 24).total_pages, 2);
        assert_eq!(HistoryPage::empty(&q).total_pages, 0);
    }

    #[test]
    fn empty_optional_fields_are_dropped() {
        let event = Event {
            title: "A".into(),
            start: "s".into(),
            end: "e".into(),
            banner: "b".into(),
            details: Some(String::new()),
            link: Some("https://x".into()),
        };
        let new = NewHistoryEvent::from_event(&event, Region::Br, EventKind::Update);
        assert!(new.details.is_none());
        assert_eq!(new.link.as_deref(), Some("https://x"));
        assert_eq!(new.event_type, EventKind::Update);
    }
}
