//! Backend E2E tests.
//!
//! These drive the real axum router end to end:
//! - Simulated DS3231 behind the real `Ds3231` transport for happy paths
//! - Mocked transport where a test must prove the bus was never touched
//!
//! # Running
//!
//! ```bash
//! cargo test -p rtcbridge-engine --lib e2e_tests
//! ```

mod e2e_helpers;

pub use e2e_helpers::*;
