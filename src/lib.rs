//! # ff-event-gateway
//!
//! REST API and WebSocket gateway for Free Fire in-game events per region.
//!
//! Current events come from a third-party upstream API, reached through a
//! fallback chain of transports. Every successful fetch is compared with the
//! previous one for the same region; entries that disappeared are archived
//! so the history view can list them after upstream drops them.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers + Relay (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── EventService / HistoryService / RelayService (service/)
//!     ├── EventBus, SnapshotRegistry (domain/)
//!     │
//!     ├── FetchOrchestrator: direct ∥ relay → public proxy (fetch/)
//!     │
//!     └── HistoryStore: PostgreSQL or in-memory (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod persistence;
pub mod service;
pub mod ws;
