//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), each with a default that works against
//! the public upstream.

use std::net::SocketAddr;
use std::time::Duration;

/// Default upstream events endpoint.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://x-ff.vercel.app/event";

/// Default public CORS relay used as the last resort.
pub const DEFAULT_PUBLIC_PROXY_URL: &str = "https://api.allorigins.win/raw";

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Use PostgreSQL for history; the in-memory store is used otherwise.
    pub persistence_enabled: bool,

    /// Upstream fetch settings.
    pub upstream: UpstreamConfig,

    /// Same-origin relay settings.
    pub relay: RelayConfig,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

/// Where and how the orchestrator reaches the upstream events API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Upstream events endpoint.
    pub base_url: String,
    /// Access key appended as the `key` query parameter.
    pub api_key: String,
    /// Relay endpoint tried alongside the direct request.
    pub relay_url: String,
    /// Public relay prefix; the upstream URL goes in its `url` parameter.
    pub public_proxy_url: String,
    /// Budget of the direct attempt.
    pub direct_timeout: Duration,
    /// Budget of the relay attempt.
    pub relay_timeout: Duration,
    /// Budget of the public relay attempt.
    pub fallback_timeout: Duration,
}

/// Behavior of the relay endpoint this service exposes.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Budget of the server-side upstream call.
    pub upstream_timeout: Duration,
    /// `max-age` of the `Cache-Control` header on relayed responses.
    pub cache_max_age_secs: u64,
    /// User-Agent sent upstream.
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            api_key: "SHAHG".to_string(),
            relay_url: "http://127.0.0.1:3000/functions/events-proxy".to_string(),
            public_proxy_url: DEFAULT_PUBLIC_PROXY_URL.to_string(),
            direct_timeout: Duration::from_millis(4_000),
            relay_timeout: Duration::from_millis(12_000),
            fallback_timeout: Duration::from_millis(15_000),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upstream_timeout: Duration::from_millis(12_000),
            cache_max_age_secs: 30,
            user_agent: concat!("ff-event-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://ff:ff@localhost:5432/ff_events".to_string());

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);
        let database_min_connections = parse_env("DATABASE_MIN_CONNECTIONS", 2);
        let database_connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5);
        let persistence_enabled = parse_env_bool("PERSISTENCE_ENABLED", true);

        let defaults = UpstreamConfig::default();
        let upstream = UpstreamConfig {
            base_url: std::env::var("UPSTREAM_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("UPSTREAM_API_KEY").unwrap_or(defaults.api_key),
            relay_url: std::env::var("RELAY_URL")
                .unwrap_or_else(|_| format!("http://{}/functions/events-proxy", loopback(listen_addr))),
            public_proxy_url: std::env::var("PUBLIC_PROXY_URL").unwrap_or(defaults.public_proxy_url),
            direct_timeout: parse_env_millis("FETCH_DIRECT_TIMEOUT_MS", defaults.direct_timeout),
            relay_timeout: parse_env_millis("FETCH_RELAY_TIMEOUT_MS", defaults.relay_timeout),
            fallback_timeout: parse_env_millis(
                "FETCH_FALLBACK_TIMEOUT_MS",
                defaults.fallback_timeout,
            ),
        };

        let relay_defaults = RelayConfig::default();
        let relay = RelayConfig {
            upstream_timeout: parse_env_millis(
                "RELAY_UPSTREAM_TIMEOUT_MS",
                relay_defaults.upstream_timeout,
            ),
            cache_max_age_secs: parse_env(
                "RELAY_CACHE_MAX_AGE_SECS",
                relay_defaults.cache_max_age_secs,
            ),
            user_agent: relay_defaults.user_agent,
        };

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1_024);
        let log_json = matches!(
            std::env::var("LOG_FORMAT").ok().as_deref(),
            Some("json" | "JSON")
        );

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout_secs,
            persistence_enabled,
            upstream,
            relay,
            event_bus_capacity,
            log_json,
        })
    }
}

/// Address the service can reach itself on; unspecified binds map to
/// loopback.
fn loopback(addr: SocketAddr) -> SocketAddr {
    if addr.ip().is_unspecified() {
        SocketAddr::from(([127, 0, 0, 1], addr.port()))
    } else {
        addr
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable holding milliseconds.
fn parse_env_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).map(|v| v.trim().to_ascii_lowercase()).ok().as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_bind_maps_to_loopback() {
        let addr: SocketAddr = SocketAddr::from(([0, 0, 0, 0], 8080));
        assert_eq!(loopback(addr).to_string(), "127.0.0.1:8080");

        let addr: SocketAddr = SocketAddr::from(([10, 0, 0, 5], 8080));
        assert_eq!(loopback(addr), addr);
    }

    #[test]
    fn direct_budget_is_shortest() {
        let cfg = UpstreamConfig::default();
        assert!(cfg.direct_timeout < cfg.relay_timeout);
        assert!(cfg.relay_timeout <= cfg.fallback_timeout);
    }

    #[test]
    fn missing_variables_use_defaults() {
        assert_eq!(parse_env("FF_GATEWAY_TEST_UNSET_NUMBER", 7_u32), 7);
        assert!(parse_env_bool("FF_GATEWAY_TEST_UNSET_BOOL", true));
        assert_eq!(
            parse_env_millis("FF_GATEWAY_TEST_UNSET_MILLIS", Duration::from_millis(5)),
            Duration::from_millis(5)
        );
    }
}
