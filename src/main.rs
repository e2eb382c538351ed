// =============================================================================
// Binance Pulse — Main Entry Point
// =============================================================================
//
// Serves a CORS-enabled kline proxy and computed quotes (price, 24h change,
// RSI-14, EMA-9/21/50) for a single Binance trading pair per request.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod binance;
mod config;
mod error;
mod indicators;
mod market_data;
mod presentation;
mod quote;
mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::binance::BinanceClient;
use crate::config::ServiceConfig;

const DEFAULT_CONFIG_PATH: &str = "pulse_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Binance Pulse starting up");

    let config_path =
        std::env::var("PULSE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = ServiceConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        let defaults = ServiceConfig::default();
        if !Path::new(&config_path).exists() {
            if let Err(e) = defaults.save(&config_path) {
                warn!(error = %e, "Failed to write default config");
            }
        }
        defaults
    });
    config.apply_overrides(|name| std::env::var(name).ok());
    config
        .validate()
        .with_context(|| format!("invalid service config ({config_path})"))?;

    info!(
        symbols = ?config.symbols,
        interval = %config.default_interval,
        limit = config.default_limit,
        "Configured quote defaults"
    );

    // ── 2. Upstream client & shared state ────────────────────────────────
    let client = BinanceClient::new(config.binance_url.clone(), config.request_timeout())
        .context("failed to build Binance client")?;
    info!(upstream = %client.base_url(), "Binance client ready");

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, Arc::new(client)));

    // ── 3. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Binance Pulse shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
