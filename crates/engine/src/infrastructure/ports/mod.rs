//! Port traits for infrastructure boundaries.
//!
//! The clock bus is the only external dependency that needs an abstraction:
//! the DS3231 adapter and the simulated device both sit behind
//! [`RtcTransport`], and tests swap in mocks.

mod error;
mod transport;

// =============================================================================
// Device Ports
// =============================================================================
pub use transport::RtcTransport;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use transport::MockRtcTransport;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{BusOp, TransportError};
