// =============================================================================
// Service Configuration — JSON file with env overrides and atomic save
// =============================================================================
//
// All fields carry `#[serde(default)]` so that a partial (or empty) file still
// loads. Environment variables are applied on top after `.env` is read:
//
//   PULSE_BIND_ADDR    listen address, e.g. 0.0.0.0:3000
//   PULSE_BINANCE_URL  upstream base URL
//   PULSE_SYMBOLS      comma-separated symbol picker list
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::binance::client::DEFAULT_BASE_URL;
use crate::market_data::source::{DEFAULT_INTERVAL, DEFAULT_LIMIT};
use crate::market_data::KlineRequest;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_binance_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_interval() -> String {
    DEFAULT_INTERVAL.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_symbols() -> Vec<String> {
    vec![
        "BTCUSDT".to_string(),
        "ETHUSDT".to_string(),
        "BNBUSDT".to_string(),
        "SOLUSDT".to_string(),
        "XRPUSDT".to_string(),
    ]
}

// =============================================================================
// ServiceConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the Binance REST API.
    #[serde(default = "default_binance_url")]
    pub binance_url: String,

    /// Timeout for a single upstream request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Candle interval used by `/api/quote` when the caller omits it.
    #[serde(default = "default_interval")]
    pub default_interval: String,

    /// Candle count used by `/api/quote` when the caller omits it.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Symbols offered to the UI picker. The first one is the default quote.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            binance_url: default_binance_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_interval: default_interval(),
            default_limit: default_limit(),
            symbols: default_symbols(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            symbols = ?config.symbols,
            "service config loaded"
        );

        Ok(config)
    }

    /// Persist to `path` via a `.tmp` sibling and rename.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "service config saved (atomic)");
        Ok(())
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(addr) = non_empty("PULSE_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(url) = non_empty("PULSE_BINANCE_URL") {
            self.binance_url = url;
        }
        if let Some(syms) = non_empty("PULSE_SYMBOLS") {
            let parsed: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.symbols = parsed;
            }
        }
    }

    /// Check the quote defaults against the same rules as client requests and
    /// upper-case the symbol list. Run once, after overrides are applied.
    pub fn validate(&mut self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }

        let default_request = |symbol: &str| KlineRequest {
            symbol: symbol.to_string(),
            interval: self.default_interval.clone(),
            limit: self.default_limit,
        };

        let mut symbols = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            let req = default_request(symbol)
                .validate()
                .with_context(|| format!("invalid quote defaults for symbol '{symbol}'"))?;
            symbols.push(req.symbol);
        }
        if symbols.is_empty() {
            default_request(self.default_symbol())
                .validate()
                .context("invalid quote defaults")?;
        }

        self.symbols = symbols;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Symbol used by `/api/quote` when none is given.
    pub fn default_symbol(&self) -> &str {
        self.symbols
            .first()
            .map(String::as_str)
            .unwrap_or(crate::market_data::source::DEFAULT_SYMBOL)
    }
}
