//! Infrastructure implementations.
//!
//! Contains the clock bus adapters plus configuration and network plumbing.

pub mod config;
pub mod ds3231;
pub mod network;
pub mod ports;
pub mod simulated;
