//! Current-events DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Event, EventStatus, Region};
use crate::fetch::Fetched;

/// One event or update with its status at response time.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDto {
    /// Event title.
    pub title: String,
    /// Start time as published upstream.
    pub start: String,
    /// End time as published upstream.
    pub end: String,
    /// Banner image URL.
    pub banner: String,
    /// Description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// External link, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Status classification.
    pub status: EventStatus,
}

impl EventDto {
    fn from_event(event: &Event, now: DateTime<Utc>) -> Self {
        Self {
            title: event.title.clone(),
            start: event.start.clone(),
            end: event.end.clone(),
            banner: event.banner.clone(),
            details: event.details.clone(),
            link: event.link.clone(),
            status: event.status_at(now),
        }
    }
}

/// Classifies `entries` at `now` and orders them active, upcoming, ended.
/// Entries with the same status keep their upstream order.
#[must_use]
pub fn sorted_entries(entries: &[Event], now: DateTime<Utc>) -> Vec<EventDto> {
    let mut dtos: Vec<EventDto> = entries
        .iter()
        .map(|e| EventDto::from_event(e, now))
        .collect();
    dtos.sort_by_key(|dto| dto.status);
    dtos
}

/// Response body for `GET /api/v1/regions/{region}/events`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventsResponse {
    /// Region served.
    pub region: Region,
    /// Upstream `status` field.
    pub status: String,
    /// Upstream owner banner.
    pub owner: String,
    /// Transport that produced the payload.
    pub fetched_via: String,
    /// Fetch latency in milliseconds.
    pub elapsed_ms: u64,
    /// Response timestamp, also used for status classification.
    pub fetched_at: DateTime<Utc>,
    /// Events, sorted by status.
    pub events: Vec<EventDto>,
    /// Updates, sorted by status.
    pub updates: Vec<EventDto>,
}

impl EventsResponse {
    /// Builds the response from a fetch result.
    #[must_use]
    pub fn from_fetched(region: Region, fetched: &Fetched, now: DateTime<Utc>) -> Self {
        Self {
            region,
            status: fetched.payload.status.clone(),
            owner: fetched.payload.owner.clone(),
            fetched_via: fetched.via.to_string(),
            elapsed_ms: u64::try_from(fetched.elapsed.as_millis()).unwrap_or(u64::MAX),
            fetched_at: now,
            events: sorted_entries(&fetched.payload.events, now),
            updates: sorted_entries(&fetched.payload.updates, now),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ev(title: &str, start: &str, end: &str) -> Event {
        Event {
            title: title.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            banner: String::new(),
            details: None,
            link: None,
        }
    }

    #[test]
    fn entries_sorted_by_status_stably() {
        let Some(now) = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).single() else {
            panic!("valid timestamp");
        };
        let entries = vec![
            ev("ended", "2026-01-01", "2026-01-02"),
            ev("garbled", "soon", "later"),
            ev("upcoming", "2026-07-01", "2026-07-02"),
            ev("active-1", "2026-06-01", "2026-06-30"),
            ev("active-2", "2026-06-10 00:00:00", "2026-06-20 00:00:00"),
        ];
        let titles: Vec<String> = sorted_entries(&entries, now)
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(
            titles,
            vec!["active-1", "active-2", "upcoming", "ended", "garbled"]
        );
    }
}
