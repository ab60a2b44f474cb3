//! Service layer: business logic orchestration.
//!
//! [`EventService`] drives fetch → reconcile → archive and emits events
//! through the [`super::domain::EventBus`]. [`HistoryService`] owns the
//! archive's error policy. [`RelayService`] forwards relay requests.

pub mod event_service;
pub mod history_service;
pub mod relay_service;

pub use event_service::EventService;
pub use history_service::HistoryService;
pub use relay_service::{RelayService, RelayedResponse};
