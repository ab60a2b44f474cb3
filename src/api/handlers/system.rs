//! System endpoints: health check, region catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::RegionDto;
use crate::app_state::AppState;
use crate::domain::Region;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /regions` — List supported regions.
#[utoipa::path(
    get,
    path = "/api/v1/regions",
    tag = "System",
    summary = "List supported regions",
    description = "Returns every region code the gateway and its relay accept.",
    responses(
        (status = 200, description = "Region catalog", body = Vec<RegionDto>),
    )
)]
pub async fn regions_handler() -> impl IntoResponse {
    let regions: Vec<RegionDto> = Region::ALL.into_iter().map(RegionDto::from).collect();
    (StatusCode::OK, Json(regions))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
