//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes archive and arrival notifications
//! for the regions a client subscribed to.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
