//! Relay request DTO.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Region selector accepted by the relay, as a query string or JSON body.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RelayParams {
    /// Region code; case-insensitive.
    #[serde(default)]
    pub region: Option<String>,
}

impl RelayParams {
    /// Reads a JSON body; anything unreadable counts as no region.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Picks the region code, query first, uppercased. Blank means absent.
    #[must_use]
    pub fn resolve(query: &Self, body: &Self) -> String {
        query
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .or_else(|| body.region.as_deref().map(str::trim))
            .unwrap_or_default()
            .to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(region: &str) -> RelayParams {
        RelayParams {
            region: Some(region.to_string()),
        }
    }

    #[test]
    fn query_takes_precedence() {
        assert_eq!(RelayParams::resolve(&with("sg"), &with("BR")), "SG");
    }

    #[test]
    fn body_used_when_query_missing() {
        assert_eq!(RelayParams::resolve(&RelayParams::default(), &with("ind")), "IND");
    }

    #[test]
    fn malformed_body_is_empty_region() {
        let body = RelayParams::from_body(b"{not json");
        assert_eq!(RelayParams::resolve(&RelayParams::default(), &body), "");
    }
}
