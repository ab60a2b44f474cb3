//! Upstream transports.
//!
//! A [`Transport`] is one way of reaching the upstream events API. The
//! concrete [`HttpTransport`] covers the three routes the orchestrator uses:
//! straight to upstream, through this service's own relay, and through a
//! public CORS relay that takes the upstream URL as a parameter.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use url::{ParseError, Url};

use crate::domain::{EventsPayload, Region};
use crate::error::TransportError;

/// One route to the upstream events API.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Short label used in logs and errors.
    fn name(&self) -> &'static str;

    /// Fetches the payload of `region`. Timeouts are applied by the caller.
    async fn fetch(&self, region: Region) -> Result<EventsPayload, TransportError>;
}

/// Builds `{base_url}?region=R&key=K`.
///
/// # Errors
///
/// Returns the parse error if `base_url` is not an absolute URL.
pub fn upstream_url(base_url: &str, api_key: &str, region: Region) -> Result<Url, ParseError> {
    Url::parse_with_params(base_url, &[("region", region.code()), ("key", api_key)])
}

#[derive(Debug, Clone)]
enum Route {
    Direct {
        base_url: String,
        api_key: String,
    },
    Relay {
        url: String,
    },
    PublicProxy {
        prefix: String,
        base_url: String,
        api_key: String,
    },
}

/// [`Transport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    name: &'static str,
    route: Route,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Direct request to the upstream API.
    #[must_use]
    pub fn direct(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            name: "direct",
            route: Route::Direct {
                base_url: base_url.to_string(),
                api_key: api_key.to_string(),
            },
            client,
        }
    }

    /// Request through the same-origin relay, which holds the access key.
    #[must_use]
    pub fn relay(client: reqwest::Client, relay_url: &str) -> Self {
        Self {
            name: "relay",
            route: Route::Relay {
                url: relay_url.to_string(),
            },
            client,
        }
    }

    /// Request through a public relay: `{prefix}?url=<upstream URL>`.
    #[must_use]
    pub fn public_proxy(
        client: reqwest::Client,
        prefix: &str,
        base_url: &str,
        api_key: &str,
    ) -> Self {
        Self {
            name: "public-proxy",
            route: Route::PublicProxy {
                prefix: prefix.to_string(),
                base_url: base_url.to_string(),
                api_key: api_key.to_string(),
            },
            client,
        }
    }

    /// The URL requested for `region`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Config`] if a configured URL is invalid.
    pub fn url_for(&self, region: Region) -> Result<Url, TransportError> {
        let config_err = |e: ParseError| TransportError::Config {
            transport: self.name,
            message: e.to_string(),
        };
        match &self.route {
            Route::Direct { base_url, api_key } => {
                upstream_url(base_url, api_key, region).map_err(config_err)
            }
            Route::Relay { url } => {
                Url::parse_with_params(url, &[("region", region.code())]).map_err(config_err)
            }
            Route::PublicProxy {
                prefix,
                base_url,
                api_key,
            } => {
                let upstream = upstream_url(base_url, api_key, region).map_err(config_err)?;
                Url::parse_with_params(prefix, &[("url", upstream.as_str())]).map_err(config_err)
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, region: Region) -> Result<EventsPayload, TransportError> {
        let url = self.url_for(region)?;
        tracing::debug!(transport = self.name, %region, %url, "fetching events");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| TransportError::Network {
                transport: self.name,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                transport: self.name,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| TransportError::Network {
                transport: self.name,
                source,
            })?;

        serde_json::from_slice::<EventsPayload>(&body).map_err(|e| TransportError::Decode {
            transport: self.name,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[test]
    fn direct_url_carries_region_and_key() {
        let t = HttpTransport::direct(client(), "https://x.example/event", "K");
        let Ok(url) = t.url_for(Region::Sg) else {
            panic!("valid url");
        };
        assert_eq!(url.as_str(), "https://x.example/event?region=SG&key=K");
    }

    #[test]
    fn relay_url_omits_key() {
        let t = HttpTransport::relay(client(), "http://127.0.0.1:3000/functions/events-proxy");
        let Ok(url) = t.url_for(Region::Ind) else {
            panic!("valid url");
        };
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:3000/functions/events-proxy?region=IND"
        );
    }

    #[test]
    fn public_proxy_encodes_upstream_url() {
        let t = HttpTransport::public_proxy(
            client(),
            "https://proxy.example/raw",
            "https://x.example/event",
            "K",
        );
        let Ok(url) = t.url_for(Region::Br) else {
            panic!("valid url");
        };
        assert_eq!(
            url.as_str(),
            "https://proxy.example/raw?url=https%3A%2F%2Fx.example%2Fevent%3Fregion%3DBR%26key%3DK"
        );
        assert_eq!(t.name(), "public-proxy");
    }

    #[test]
    fn relative_url_is_a_config_error() {
        let t = HttpTransport::relay(client(), "/functions/events-proxy");
        let Err(err) = t.url_for(Region::Sg) else {
            panic!("relative url must be rejected");
        };
        assert!(matches!(err, TransportError::Config { transport: "relay", .. }));
    }
}
