//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers::{events, history, relay, system};

/// Generated OpenAPI description, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "ff-event-gateway",
        description = "Free Fire events per region, with an archive of entries that were taken down."
    ),
    paths(
        system::health_handler,
        system::regions_handler,
        events::current_events,
        history::history,
        relay::relay,
    ),
    tags(
        (name = "System", description = "Health and catalog"),
        (name = "Events", description = "Current events and updates"),
        (name = "History", description = "Archive of removed entries"),
        (name = "Relay", description = "Same-origin upstream relay"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/regions",
            "/api/v1/regions/{region}/events",
            "/api/v1/regions/{region}/history",
            "/functions/events-proxy",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
