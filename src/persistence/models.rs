//! Database row shape of `event_history`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{EventKind, HistoryEvent, Region};
use crate::error::GatewayError;

/// Column tuple selected from `event_history`, in column order.
pub type HistoryRow = (
    Uuid,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    DateTime<Utc>,
);

/// Column list matching [`HistoryRow`].
pub const HISTORY_COLUMNS: &str =
    "id, region, title, banner, start_date, end_date, details, link, event_type, removed_at";

/// Converts a selected row into the domain record.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the stored region or
/// `event_type` is not a known value.
pub fn into_history_event(row: HistoryRow) -> Result<HistoryEvent, GatewayError> {
    let (id, region, title, banner, start_date, end_date, details, link, event_type, removed_at) =
        row;

    let region: Region = region
        .parse()
        .map_err(|e: GatewayError| GatewayError::PersistenceError(format!("row {id}: {e}")))?;
    let event_type = EventKind::from_db(&event_type).ok_or_else(|| {
        GatewayError::PersistenceError(format!("row {id}: unknown event_type {event_type}"))
    })?;

    Ok(HistoryEvent {
        id,
        region,
        title,
        banner,
        start_date,
        end_date,
        details,
        link,
        event_type,
        removed_at,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn row(region: &str, event_type: &str) -> HistoryRow {
        (
            Uuid::new_v4(),
            region.to_string(),
            "A".to_string(),
            "u1".to_string(),
            "2026-01-01".to_string(),
            "2026-01-02".to_string(),
            None,
            Some("https://x".to_string()),
            event_type.to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn converts_valid_row() {
        let Ok(event) = into_history_event(row("SG", "update")) else {
            panic!("row should convert");
        };
        assert_eq!(event.region, Region::Sg);
        assert_eq!(event.event_type, EventKind::Update);
        assert_eq!(event.link.as_deref(), Some("https://x"));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(into_history_event(row("XX", "event")).is_err());
        assert!(into_history_event(row("SG", "promo")).is_err());
    }
}
