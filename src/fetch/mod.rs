//! Upstream acquisition: transports and the fetch orchestrator.
//!
//! The upstream events API is unreliable and, from a browser, CORS
//! restricted. [`FetchOrchestrator`] races the direct and relay
//! [`Transport`]s and falls back to a public relay when both fail.

pub mod orchestrator;
pub mod transport;

pub use orchestrator::{FetchOrchestrator, FetchTimeouts, Fetched};
pub use transport::{HttpTransport, Transport, upstream_url};
