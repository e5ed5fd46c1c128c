//! Environment-driven configuration.

use std::net::SocketAddr;
use std::time::Duration;

use crate::infrastructure::ds3231::DEFAULT_ADDRESS;
use crate::use_cases::poller::DEFAULT_POLL_INTERVAL;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid value `{value}` ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Runtime settings for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Linux I2C character device (e.g. `/dev/i2c-1`). `None` runs against
    /// the simulated clock.
    pub i2c_bus: Option<String>,
    pub i2c_address: u8,
    pub poll_interval: Duration,
    /// Log every address on the bus at startup.
    pub i2c_scan: bool,
    pub cors_allowed_origins: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 8080,
            i2c_bus: None,
            i2c_address: DEFAULT_ADDRESS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            i2c_scan: false,
            cors_allowed_origins: None,
        }
    }
}

impl AppConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("SERVER_PORT", &raw, e))?,
            None => defaults.server_port,
        };

        let i2c_address = match get("RTC_I2C_ADDRESS") {
            Some(raw) => parse_i2c_address(&raw)?,
            None => defaults.i2c_address,
        };

        let poll_interval = match get("RTC_POLL_INTERVAL_MS") {
            Some(raw) => {
                let ms = raw
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid("RTC_POLL_INTERVAL_MS", &raw, e))?;
                if ms == 0 {
                    return Err(ConfigError::invalid(
                        "RTC_POLL_INTERVAL_MS",
                        &raw,
                        "must be greater than zero",
                    ));
                }
                Duration::from_millis(ms)
            }
            None => defaults.poll_interval,
        };

        let i2c_scan = match get("RTC_I2C_SCAN") {
            Some(raw) => parse_bool("RTC_I2C_SCAN", &raw)?,
            None => defaults.i2c_scan,
        };

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            i2c_bus: get("RTC_I2C_BUS"),
            i2c_address,
            poll_interval,
            i2c_scan,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server_host, self.server_port);
        raw.parse()
            .map_err(|e| ConfigError::invalid("SERVER_HOST", &raw, e))
    }
}

/// Decimal or `0x`-prefixed hex, limited to 7-bit addresses.
fn parse_i2c_address(raw: &str) -> Result<u8, ConfigError> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => raw.parse::<u8>(),
    }
    .map_err(|e| ConfigError::invalid("RTC_I2C_ADDRESS", raw, e))?;

    if parsed > 0x7F {
        return Err(ConfigError::invalid(
            "RTC_I2C_ADDRESS",
            raw,
            "not a 7-bit address",
        ));
    }
    Ok(parsed)
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(var, raw, "expected true or false")),
    }
}
