//! Current-events handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::EventsResponse;
use crate::app_state::AppState;
use crate::domain::Region;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /regions/{region}/events` — Current events and updates.
///
/// Each call also reconciles the payload with the previous one for the
/// region and archives whatever disappeared.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRegion`] for an unknown region and
/// [`GatewayError::UpstreamUnavailable`] when every transport failed.
#[utoipa::path(
    get,
    path = "/api/v1/regions/{region}/events",
    tag = "Events",
    summary = "Current events",
    description = "Fetches the region's current events and updates through the transport fallback chain, sorted active, upcoming, ended, unknown.",
    params(
        ("region" = String, Path, description = "Region code, e.g. SG"),
    ),
    responses(
        (status = 200, description = "Current events", body = EventsResponse),
        (status = 400, description = "Unknown region", body = ErrorResponse),
        (status = 502, description = "All transports failed", body = ErrorResponse),
    )
)]
pub async fn current_events(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let region: Region = code.parse()?;
    let fetched = state.event_service.current_events(region).await?;
    Ok(Json(EventsResponse::from_fetched(region, &fetched, Utc::now())))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/regions/{region}/events", get(current_events))
}
