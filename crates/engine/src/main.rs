//! RTC Bridge Engine - Main entry point.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rtcbridge_engine::{
    api,
    infrastructure::{
        config::AppConfig,
        ds3231::Ds3231,
        network::{self, NetworkIdentity},
        ports::RtcTransport,
        simulated::SimulatedDs3231,
    },
    use_cases::ClockPoller,
    App,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary is usually run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rtcbridge_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RTC Bridge Engine");

    let config = AppConfig::from_env().context("loading configuration")?;
    let addr = config.bind_addr()?;

    // The clock transport is created exactly once; everything else reaches
    // the device through the clock service.
    let transport = build_transport(&config)?;
    let identity = NetworkIdentity::new();
    let app = Arc::new(App::new(transport, identity.clone()));

    // Spawn network identity refresher
    tokio::spawn(network::run_refresher(identity, network::REFRESH_INTERVAL));

    // Spawn clock poller
    tokio::spawn(ClockPoller::new(app.clock.clone(), config.poll_interval).run());

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_transport(config: &AppConfig) -> anyhow::Result<Box<dyn RtcTransport>> {
    if let Some(path) = config.i2c_bus.as_deref() {
        return open_hardware(path, config);
    }

    tracing::warn!(
        address = %format!("0x{:02X}", config.i2c_address),
        "RTC_I2C_BUS not set, using simulated DS3231"
    );
    let mut rtc = Ds3231::new(SimulatedDs3231::new(config.i2c_address), config.i2c_address);
    if config.i2c_scan {
        log_scan(rtc.scan());
    }
    Ok(Box::new(rtc))
}

#[cfg(feature = "linux-i2c")]
fn open_hardware(path: &str, config: &AppConfig) -> anyhow::Result<Box<dyn RtcTransport>> {
    let bus = linux_embedded_hal::I2cdev::new(path)
        .with_context(|| format!("opening I2C bus {path}"))?;
    let mut rtc = Ds3231::new(bus, config.i2c_address);
    tracing::info!(
        bus = path,
        address = %format!("0x{:02X}", rtc.address()),
        "I2C init done"
    );
    if config.i2c_scan {
        log_scan(rtc.scan());
    }
    Ok(Box::new(rtc))
}

#[cfg(not(feature = "linux-i2c"))]
fn open_hardware(path: &str, _config: &AppConfig) -> anyhow::Result<Box<dyn RtcTransport>> {
    anyhow::bail!("RTC_I2C_BUS={path} needs the `linux-i2c` feature")
}

fn log_scan(found: Vec<u8>) {
    tracing::info!("I2C scanning...");
    if found.is_empty() {
        tracing::warn!("No I2C devices acknowledged");
    }
    for address in found {
        tracing::info!("Found device at 0x{:02X}", address);
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // The control page posts form bodies, which can trigger preflights from other origins.
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
