//! Transport race with a last-resort fallback.
//!
//! [`FetchOrchestrator::fetch`] starts the direct and relay transports
//! together, each under its own timeout, and returns the first payload that
//! arrives. When both fail it tries the public relay alone and returns
//! whatever that yields. There are no retries beyond these three attempts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;

use super::transport::{HttpTransport, Transport};
use crate::config::UpstreamConfig;
use crate::domain::{EventsPayload, Region};
use crate::error::TransportError;

/// Per-attempt time budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTimeouts {
    /// Budget of the direct attempt.
    pub direct: Duration,
    /// Budget of the relay attempt.
    pub relay: Duration,
    /// Budget of the fallback attempt.
    pub fallback: Duration,
}

impl From<&UpstreamConfig> for FetchTimeouts {
    fn from(cfg: &UpstreamConfig) -> Self {
        Self {
            direct: cfg.direct_timeout,
            relay: cfg.relay_timeout,
            fallback: cfg.fallback_timeout,
        }
    }
}

/// A payload together with the transport that delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Upstream payload.
    pub payload: EventsPayload,
    /// Label of the winning transport.
    pub via: &'static str,
    /// Wall time from start to the winning response.
    pub elapsed: Duration,
}

/// Acquires a region's payload over the first transport that answers.
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    direct: Arc<dyn Transport>,
    relay: Arc<dyn Transport>,
    fallback: Arc<dyn Transport>,
    timeouts: FetchTimeouts,
}

impl FetchOrchestrator {
    /// Creates an orchestrator over explicit transports.
    #[must_use]
    pub fn new(
        direct: Arc<dyn Transport>,
        relay: Arc<dyn Transport>,
        fallback: Arc<dyn Transport>,
        timeouts: FetchTimeouts,
    ) -> Self {
        Self {
            direct,
            relay,
            fallback,
            timeouts,
        }
    }

    /// Creates the HTTP transports described by `cfg` over one client.
    #[must_use]
    pub fn from_config(client: &Client, cfg: &UpstreamConfig) -> Self {
        Self::new(
            Arc::new(HttpTransport::direct(
                client.clone(),
                &cfg.base_url,
                &cfg.api_key,
            )),
            Arc::new(HttpTransport::relay(client.clone(), &cfg.relay_url)),
            Arc::new(HttpTransport::public_proxy(
                client.clone(),
                &cfg.public_proxy_url,
                &cfg.base_url,
                &cfg.api_key,
            )),
            FetchTimeouts::from(cfg),
        )
    }

    /// Fetches the current payload of `region`.
    ///
    /// The losing primary attempt is dropped as soon as a winner returns,
    /// which cancels its request.
    ///
    /// # Errors
    ///
    /// Returns the fallback transport's [`TransportError`] when all three
    /// attempts fail or time out.
    pub async fn fetch(&self, region: Region) -> Result<Fetched, TransportError> {
        let started = Instant::now();

        let direct = attempt(self.direct.as_ref(), region, self.timeouts.direct);
        let relay = attempt(self.relay.as_ref(), region, self.timeouts.relay);
        tokio::pin!(direct, relay);

        let mut direct_done = false;
        let mut relay_done = false;
        loop {
            let result = tokio::select! {
                res = &mut direct, if !direct_done => {
                    direct_done = true;
                    res
                }
                res = &mut relay, if !relay_done => {
                    relay_done = true;
                    res
                }
                else => break,
            };
            match result {
                Ok((payload, via)) => {
                    let elapsed = started.elapsed();
                    tracing::debug!(
                        %region,
                        via,
                        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        "primary transport won"
                    );
                    return Ok(Fetched {
                        payload,
                        via,
                        elapsed,
                    });
                }
                Err(err) => {
                    tracing::warn!(%region, transport = err.transport(), error = %err, "primary transport failed");
                }
            }
        }

        tracing::warn!(%region, transport = self.fallback.name(), "both primary transports failed, falling back");
        match attempt(self.fallback.as_ref(), region, self.timeouts.fallback).await {
            Ok((payload, via)) => Ok(Fetched {
                payload,
                via,
                elapsed: started.elapsed(),
            }),
            Err(err) => {
                tracing::error!(%region, error = %err, "all transports exhausted");
                Err(err)
            }
        }
    }
}

/// Runs one transport under its own budget.
async fn attempt(
    transport: &dyn Transport,
    region: Region,
    budget: Duration,
) -> Result<(EventsPayload, &'static str), TransportError> {
    let name = transport.name();
    match tokio::time::timeout(budget, transport.fetch(region)).await {
        Ok(Ok(payload)) => Ok((payload, name)),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(TransportError::Timeout {
            transport: name,
            after: budget,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::Event;

    #[derive(Debug)]
    struct StubTransport {
        name: &'static str,
        delay: Duration,
        succeed: bool,
        calls: AtomicUsize,
        finished: AtomicUsize,
    }

    impl StubTransport {
        fn new(name: &'static str, delay_ms: u64, succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                delay: Duration::from_millis(delay_ms),
                succeed,
                calls: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, region: Region) -> Result<EventsPayload, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(EventsPayload {
                    status: "success".to_string(),
                    owner: self.name.to_string(),
                    region: region.code().to_string(),
                    events: vec![Event {
                        title: format!("from {}", self.name),
                        start: "2026-01-01".to_string(),
                        end: "2026-01-02".to_string(),
                        banner: "u1".to_string(),
                        details: None,
                        link: None,
                    }],
                    updates: Vec::new(),
                })
            } else {
                Err(TransportError::Status {
                    transport: self.name,
                    status: 503,
                })
            }
        }
    }

    fn timeouts(direct: u64, relay: u64, fallback: u64) -> FetchTimeouts {
        FetchTimeouts {
            direct: Duration::from_millis(direct),
            relay: Duration::from_millis(relay),
            fallback: Duration::from_millis(fallback),
        }
    }

    fn orchestrator(
        direct: &Arc<StubTransport>,
        relay: &Arc<StubTransport>,
        fallback: &Arc<StubTransport>,
        t: FetchTimeouts,
    ) -> FetchOrchestrator {
        FetchOrchestrator::new(
            Arc::clone(direct) as Arc<dyn Transport>,
            Arc::clone(relay) as Arc<dyn Transport>,
            Arc::clone(fallback) as Arc<dyn Transport>,
            t,
        )
    }

    #[tokio::test]
    async fn fast_direct_wins_without_waiting_for_relay() {
        let direct = StubTransport::new("direct", 100, true);
        let relay = StubTransport::new("relay", 3_000, true);
        let fallback = StubTransport::new("public-proxy", 0, true);
        let orch = orchestrator(&direct, &relay, &fallback, timeouts(2_000, 5_000, 5_000));

        let started = Instant::now();
        let Ok(fetched) = orch.fetch(Region::Sg).await else {
            panic!("direct should win");
        };
        assert_eq!(fetched.via, "direct");
        assert_eq!(fetched.payload.owner, "direct");
        assert!(started.elapsed() < Duration::from_millis(1_500));
        assert_eq!(relay.finished.load(Ordering::SeqCst), 0);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn relay_wins_when_direct_fails() {
        let direct = StubTransport::new("direct", 10, false);
        let relay = StubTransport::new("relay", 150, true);
        let fallback = StubTransport::new("public-proxy", 0, true);
        let orch = orchestrator(&direct, &relay, &fallback, timeouts(1_000, 1_000, 1_000));

        let Ok(fetched) = orch.fetch(Region::Th).await else {
            panic!("relay should win");
        };
        assert_eq!(fetched.via, "relay");
        assert_eq!(fetched.payload.region, "TH");
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn relay_wins_when_direct_times_out() {
        let direct = StubTransport::new("direct", 2_000, true);
        let relay = StubTransport::new("relay", 300, true);
        let fallback = StubTransport::new("public-proxy", 0, true);
        let orch = orchestrator(&direct, &relay, &fallback, timeouts(50, 1_000, 1_000));

        let Ok(fetched) = orch.fetch(Region::Sg).await else {
            panic!("relay should win");
        };
        assert_eq!(fetched.via, "relay");
    }

    #[tokio::test]
    async fn fallback_used_when_both_primaries_fail() {
        let direct = StubTransport::new("direct", 10, false);
        let relay = StubTransport::new("relay", 20, false);
        let fallback = StubTransport::new("public-proxy", 50, true);
        let orch = orchestrator(&direct, &relay, &fallback, timeouts(500, 500, 500));

        let Ok(fetched) = orch.fetch(Region::Br).await else {
            panic!("fallback should answer");
        };
        assert_eq!(fetched.via, "public-proxy");
        assert_eq!(direct.calls(), 1);
        assert_eq!(relay.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn fallback_used_when_both_primaries_time_out() {
        let direct = StubTransport::new("direct", 1_000, true);
        let relay = StubTransport::new("relay", 1_000, true);
        let fallback = StubTransport::new("public-proxy", 10, true);
        let orch = orchestrator(&direct, &relay, &fallback, timeouts(30, 60, 500));

        let Ok(fetched) = orch.fetch(Region::Vn).await else {
            panic!("fallback should answer");
        };
        assert_eq!(fetched.via, "public-proxy");
    }

    #[tokio::test]
    async fn exhaustion_surfaces_single_fallback_error() {
        let direct = StubTransport::new("direct", 10, false);
        let relay = StubTransport::new("relay", 10, false);
        let fallback = StubTransport::new("public-proxy", 10, false);
        let orch = orchestrator(&direct, &relay, &fallback, timeouts(500, 500, 500));

        let Err(err) = orch.fetch(Region::Sg).await else {
            panic!("all transports failed");
        };
        assert_eq!(err.transport(), "public-proxy");
        assert!(matches!(err, TransportError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn fallback_timeout_is_reported() {
        let direct = StubTransport::new("direct", 10, false);
        let relay = StubTransport::new("relay", 10, false);
        let fallback = StubTransport::new("public-proxy", 1_000, true);
        let orch = orchestrator(&direct, &relay, &fallback, timeouts(500, 500, 40));

        let Err(err) = orch.fetch(Region::Sg).await else {
            panic!("fallback should time out");
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "public-proxy timed out after 40ms");
    }

    #[test]
    fn timeouts_follow_config() {
        let cfg = UpstreamConfig::default();
        let t = FetchTimeouts::from(&cfg);
        assert_eq!(t.direct, cfg.direct_timeout);
        assert_eq!(t.fallback, cfg.fallback_timeout);
    }
}
