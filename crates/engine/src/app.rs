//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::network::NetworkIdentity;
use crate::infrastructure::ports::RtcTransport;
use crate::use_cases::ClockService;

/// Main application state.
///
/// Holds the one clock service and the display address.
/// Passed to HTTP handlers via Axum state; the poller gets its own handle
/// to the same clock.
pub struct App {
    pub clock: Arc<ClockService>,
    pub network: NetworkIdentity,
}

impl App {
    /// Wire up around an already-opened clock transport.
    pub fn new(transport: Box<dyn RtcTransport>, network: NetworkIdentity) -> Self {
        Self {
            clock: Arc::new(ClockService::new(transport)),
            network,
        }
    }
}
