//! Clock device port.

use rtcbridge_domain::RtcTime;

use super::error::TransportError;

/// One physical clock reached over a bus that serves a single transaction
/// at a time.
///
/// Implementations block until the bus finishes or reports failure, and own
/// the bus handle exclusively. They do not serialize callers; that is the
/// clock service's job.
#[cfg_attr(test, mockall::automock)]
pub trait RtcTransport: Send {
    /// Read the seven timekeeping registers in one write-then-read transaction.
    fn read_raw(&mut self) -> Result<RtcTime, TransportError>;

    /// Write all timekeeping registers in a single transaction.
    fn write_raw(&mut self, time: &RtcTime) -> Result<(), TransportError>;
}
