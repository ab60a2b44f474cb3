//! Same-origin relay to the upstream events API.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::api::dto::RelayParams;
use crate::app_state::AppState;
use crate::domain::Region;
use crate::error::{ErrorResponse, GatewayError};

/// Path of the relay endpoint.
pub const RELAY_PATH: &str = "/functions/events-proxy";

/// `GET|POST /functions/events-proxy` — Forward one region request upstream.
///
/// The region comes from `?region=` or, failing that, a JSON body
/// `{"region": "SG"}`. The upstream body and status are returned unchanged.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRegion`] (400) for a missing or unknown
/// region and [`GatewayError::UpstreamUnavailable`] (502) on upstream
/// timeout or failure.
#[utoipa::path(
    get,
    path = "/functions/events-proxy",
    tag = "Relay",
    summary = "Relay upstream events",
    description = "Forwards the request to the upstream events API with the server-held key and returns its JSON verbatim. POST with a JSON body {\"region\": \"SG\"} is accepted too.",
    params(RelayParams),
    request_body = RelayParams,
    responses(
        (status = 200, description = "Upstream JSON, verbatim", body = serde_json::Value),
        (status = 400, description = "Missing or unknown region", body = ErrorResponse),
        (status = 502, description = "Upstream timeout or failure", body = ErrorResponse),
    )
)]
pub async fn relay(
    State(state): State<AppState>,
    Query(query): Query<RelayParams>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let code = RelayParams::resolve(&query, &RelayParams::from_body(&body));
    let region: Region = code.parse()?;

    let relayed = state.relay_service.forward(region).await?;
    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let cache_control = format!(
        "public, max-age={}",
        state.relay_service.cache_max_age_secs()
    );

    Ok((
        status,
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
            (header::CACHE_CONTROL, cache_control),
        ],
        relayed.body,
    )
        .into_response())
}

/// Relay routes, mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route(RELAY_PATH, get(relay).post(relay))
}
