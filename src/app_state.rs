//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use reqwest::Client;

use crate::config::GatewayConfig;
use crate::domain::{EventBus, SnapshotRegistry};
use crate::fetch::FetchOrchestrator;
use crate::persistence::HistoryStore;
use crate::service::{EventService, HistoryService, RelayService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Fetch, reconcile and archive path.
    pub event_service: Arc<EventService>,
    /// History reads.
    pub history_service: Arc<HistoryService>,
    /// Upstream relay.
    pub relay_service: Arc<RelayService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires the service layer from configuration, one HTTP client and a
    /// history store.
    #[must_use]
    pub fn new(config: &GatewayConfig, client: &Client, store: Arc<dyn HistoryStore>) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let history_service = HistoryService::new(store);
        let orchestrator = FetchOrchestrator::from_config(client, &config.upstream);

        let event_service = EventService::new(
            orchestrator,
            Arc::new(SnapshotRegistry::new()),
            history_service.clone(),
            event_bus.clone(),
        );
        let relay_service = RelayService::new(client.clone(), &config.upstream, config.relay.clone());

        Self {
            event_service: Arc::new(event_service),
            history_service: Arc::new(history_service),
            relay_service: Arc::new(relay_service),
            event_bus,
        }
    }
}
