//! RTC Bridge Engine library.
//!
//! Serves a DS3231 real-time clock over HTTP.
//!
//! ## Structure
//!
//! - `use_cases/` - Clock service (bus arbitration) and background poller
//! - `infrastructure/` - Transport port, DS3231 adapter, simulated device, config
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// End-to-end HTTP tests against the simulated device.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
