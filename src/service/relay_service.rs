//! Relay service: server-side forwarding of upstream requests.
//!
//! Browsers cannot call the upstream API directly because of CORS. The relay
//! endpoint forwards a region request from here, holding the access key, and
//! hands the upstream body back untouched.

use axum::body::Bytes;
use reqwest::Client;

use crate::config::{RelayConfig, UpstreamConfig};
use crate::domain::Region;
use crate::error::GatewayError;
use crate::fetch::upstream_url;

/// Upstream answer passed through verbatim.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    /// Upstream HTTP status.
    pub status: u16,
    /// Upstream body.
    pub body: Bytes,
}

/// Forwards region requests to the upstream API.
#[derive(Debug, Clone)]
pub struct RelayService {
    client: Client,
    base_url: String,
    api_key: String,
    config: RelayConfig,
}

impl RelayService {
    /// Creates a new `RelayService`.
    #[must_use]
    pub fn new(client: Client, upstream: &UpstreamConfig, config: RelayConfig) -> Self {
        Self {
            client,
            base_url: upstream.base_url.clone(),
            api_key: upstream.api_key.clone(),
            config,
        }
    }

    /// `max-age` advertised on relayed responses.
    #[must_use]
    pub const fn cache_max_age_secs(&self) -> u64 {
        self.config.cache_max_age_secs
    }

    /// Forwards one request for `region`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] on timeout or network
    /// failure, and [`GatewayError::Internal`] if the upstream URL is
    /// misconfigured.
    pub async fn forward(&self, region: Region) -> Result<RelayedResponse, GatewayError> {
        let url = upstream_url(&self.base_url, &self.api_key, region)
            .map_err(|e| GatewayError::Internal(format!("upstream url: {e}")))?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .timeout(self.config.upstream_timeout)
            .send()
            .await
            .map_err(|e| relay_failure(region, &e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| relay_failure(region, &e))?;

        tracing::debug!(%region, status, bytes = body.len(), "relayed upstream response");
        Ok(RelayedResponse { status, body })
    }
}

fn relay_failure(region: Region, err: &reqwest::Error) -> GatewayError {
    tracing::warn!(%region, timeout = err.is_timeout(), error = %err, "relay upstream call failed");
    if err.is_timeout() {
        GatewayError::UpstreamUnavailable("upstream timed out".to_string())
    } else {
        GatewayError::UpstreamUnavailable(err.to_string())
    }
}
