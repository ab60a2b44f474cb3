//! Upstream event records and their identity.
//!
//! An [`Event`] only lives for one fetch cycle. It carries no identifier, so
//! comparisons between snapshots go through [`EventKey`], the exact-string
//! tuple `(Title, Banner, Start, End)`.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A promotional item as returned by the upstream events API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Display title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Start of the display window, as sent by upstream.
    #[serde(rename = "Start")]
    pub start: String,
    /// End of the display window, as sent by upstream.
    #[serde(rename = "End")]
    pub end: String,
    /// Banner image URL.
    #[serde(rename = "Banner")]
    pub banner: String,
    /// Optional long-form description.
    #[serde(rename = "Details", default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Optional external link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Event {
    /// Returns the identity key used to compare snapshots.
    #[must_use]
    pub fn key(&self) -> EventKey<'_> {
        EventKey {
            title: &self.title,
            banner: &self.banner,
            start: &self.start,
            end: &self.end,
        }
    }

    /// Classifies the display window relative to `now`.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        EventStatus::classify(&self.start, &self.end, now)
    }
}

/// Borrowed identity of an [`Event`].
///
/// Equality is exact-string: a one-character difference in any field makes
/// two keys distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey<'a> {
    title: &'a str,
    banner: &'a str,
    start: &'a str,
    end: &'a str,
}

impl fmt::Display for EventKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.title, self.banner, self.start, self.end)
    }
}

/// Upstream response envelope for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventsPayload {
    /// Upstream status string (e.g. `"success"`).
    #[serde(default)]
    pub status: String,
    /// Upstream owner banner.
    #[serde(rename = "API Owner", default)]
    pub owner: String,
    /// Region echoed by upstream.
    #[serde(default)]
    pub region: String,
    /// Time-boxed events.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Announcements.
    #[serde(default)]
    pub updates: Vec<Event>,
}

impl EventsPayload {
    /// Returns the list for the given kind.
    #[must_use]
    pub fn entries(&self, kind: EventKind) -> &[Event] {
        match kind {
            EventKind::Event => &self.events,
            EventKind::Update => &self.updates,
        }
    }
}

/// Which list of the payload an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Time-boxed event.
    Event,
    /// Announcement.
    Update,
}

impl EventKind {
    /// Both kinds, in payload order.
    pub const ALL: [Self; 2] = [Self::Event, Self::Update];

    /// Value stored in the `event_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Update => "update",
        }
    }

    /// Parses a stored `event_type` value.
    #[must_use]
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "event" => Some(Self::Event),
            "update" => Some(Self::Update),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of "now" relative to an event's display window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Window is open.
    Active,
    /// Window has not opened yet.
    Upcoming,
    /// Window has closed, or its bounds could not be read.
    Ended,
}

impl EventStatus {
    /// Classifies a `[start, end]` window. Both bounds are inclusive.
    ///
    /// A bound that fails to parse never satisfies a comparison, so such
    /// entries fall through to [`EventStatus::Ended`] unless a readable
    /// start is still in the future.
    #[must_use]
    pub fn classify(start: &str, end: &str, now: DateTime<Utc>) -> Self {
        let start = parse_timestamp(start);
        let end = parse_timestamp(end);
        match (start, end) {
            (Some(start), _) if now < start => Self::Upcoming,
            (Some(start), Some(end)) if start <= now && now <= end => Self::Active,
            _ => Self::Ended,
        }
    }
}

/// Parses the date formats seen from upstream. Naive values are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        let Some(dt) = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single() else {
            panic!("valid timestamp");
        };
        dt
    }

    #[test]
    fn deserializes_upstream_shape() {
        let json = r#"{
            "status": "success",
            "API Owner": "someone",
            "region": "SG",
            "events": [
                {"Title": "A", "Start": "2026-01-01", "End": "2026-01-02", "Banner": "u1"}
            ],
            "updates": [
                {"Title": "B", "Start": "2026-01-01", "End": "2026-01-03", "Banner": "u2",
                 "Details": "patch notes", "link": "https://example.com", "extra": 1}
            ]
        }"#;
        let Ok(payload) = serde_json::from_str::<EventsPayload>(json) else {
            panic!("payload should parse");
        };
        assert_eq!(payload.owner, "someone");
        assert_eq!(payload.events.len(), 1);
        assert_eq!(payload.entries(EventKind::Update).len(), 1);
        assert_eq!(
            payload.updates.first().and_then(|u| u.details.as_deref()),
            Some("patch notes")
        );
        assert!(payload.events.first().is_some_and(|e| e.link.is_none()));
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let Ok(payload) = serde_json::from_str::<EventsPayload>(r#"{"status":"ok"}"#) else {
            panic!("payload should parse");
        };
        assert!(payload.events.is_empty());
        assert!(payload.updates.is_empty());
    }

    #[test]
    fn key_display_joins_fields() {
        let event = Event {
            title: "A".into(),
            start: "s".into(),
            end: "e".into(),
            banner: "b".into(),
            details: None,
            link: None,
        };
        assert_eq!(event.key().to_string(), "A-b-s-e");
    }

    #[test]
    fn status_classification() {
        let now = at(2026, 1, 2, 12);
        assert_eq!(
            EventStatus::classify("2026-01-03", "2026-01-04", now),
            EventStatus::Upcoming
        );
        assert_eq!(
            EventStatus::classify("2026-01-01 00:00:00", "2026-01-03 00:00:00", now),
            EventStatus::Active
        );
        assert_eq!(
            EventStatus::classify("2025-12-01T00:00:00Z", "2026-01-01T00:00:00+00:00", now),
            EventStatus::Ended
        );
    }

    #[test]
    fn unreadable_bounds_count_as_ended() {
        let now = at(2026, 1, 2, 12);
        assert_eq!(
            EventStatus::classify("soon", "2026-01-04", now),
            EventStatus::Ended
        );
        assert_eq!(
            EventStatus::classify("2026-01-01", "forever", now),
            EventStatus::Ended
        );
        assert_eq!(
            EventStatus::classify("2026-02-01", "forever", now),
            EventStatus::Upcoming
        );
    }

    #[test]
    fn end_bound_is_inclusive() {
        let now = at(2026, 1, 2, 0);
        assert_eq!(
            EventStatus::classify("2026-01-01", "2026-01-02", now),
            EventStatus::Active
        );
    }

    #[test]
    fn kind_db_values() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_db(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_db("all"), None);
    }
}
