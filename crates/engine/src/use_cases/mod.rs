//! Use cases - the clock's operations as seen by callers.

pub mod clock;
pub mod poller;

pub use clock::{ClockError, ClockService};
pub use poller::ClockPoller;
