//! Network identity shown on the control page.
//!
//! The value is display-only: readers may see a stale address for a while
//! after it changes.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::RwLock;

pub const NOT_CONNECTED: &str = "Not connected";

/// How often [`run_refresher`] re-checks the outbound address.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Any routable address works; no packet is sent.
const PROBE_TARGET: &str = "8.8.8.8:80";

/// Shared, occasionally-updated address string.
#[derive(Clone)]
pub struct NetworkIdentity {
    address: Arc<RwLock<String>>,
}

impl NetworkIdentity {
    pub fn new() -> Self {
        Self {
            address: Arc::new(RwLock::new(NOT_CONNECTED.to_string())),
        }
    }

    pub async fn current(&self) -> String {
        self.address.read().await.clone()
    }

    /// Returns `true` when the stored value changed.
    pub async fn set(&self, address: impl Into<String>) -> bool {
        let address = address.into();
        let mut guard = self.address.write().await;
        if *guard == address {
            return false;
        }
        *guard = address;
        true
    }
}

impl Default for NetworkIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// The local address the host would use for outbound traffic.
pub async fn discover_local_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await.ok()?;
    socket.connect(PROBE_TARGET).await.ok()?;
    socket
        .local_addr()
        .ok()
        .map(|addr| addr.ip())
        .filter(|ip| !ip.is_unspecified())
}

/// Keep `identity` in step with the host's address. Never returns.
pub async fn run_refresher(identity: NetworkIdentity, interval: Duration) {
    loop {
        match discover_local_address().await {
            Some(ip) => {
                if identity.set(ip.to_string()).await {
                    tracing::info!(address = %ip, "Got IP: {}", ip);
                }
            }
            None => {
                if identity.set(NOT_CONNECTED).await {
                    tracing::info!("Network address lost");
                }
            }
        }
        tokio::time::sleep(interval).await;
    }
}
