//! Request bodies accepted by the HTTP API.

pub mod time;
