//! RTC Bridge Protocol - wire types for the clock HTTP API
//!
//! - Request parsing (`application/x-www-form-urlencoded` set-time bodies)
//! - Response bodies (JSON time reads)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - only serde, url and thiserror
//! 2. **No business logic** - parsing and shaping only; range checks live in the domain

pub mod requests;
pub mod responses;

pub use requests::time::{parse_set_time_form, FormError, MAX_FORM_BODY_BYTES};
pub use responses::TimeResponse;
