//! History handler.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{HistoryParams, HistoryResponse};
use crate::app_state::AppState;
use crate::domain::Region;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /regions/{region}/history` — Paginated archive of removed entries.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRegion`] for an unknown region. Store
/// failures are served as an empty page.
#[utoipa::path(
    get,
    path = "/api/v1/regions/{region}/history",
    tag = "History",
    summary = "Event history",
    description = "Returns archived events and updates of a region, most recently removed first, with optional title search and type filter.",
    params(
        ("region" = String, Path, description = "Region code, e.g. SG"),
        HistoryParams,
    ),
    responses(
        (status = 200, description = "One page of history", body = HistoryResponse),
        (status = 400, description = "Unknown region", body = ErrorResponse),
    )
)]
pub async fn history(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let region: Region = code.parse()?;
    let query = params.to_query();
    let page = state.history_service.page(region, &query).await;
    Ok(Json(HistoryResponse::new(region, page)))
}

/// History routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/regions/{region}/history", get(history))
}
