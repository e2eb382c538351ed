// =============================================================================
// Binance REST API Client — public market data
// =============================================================================
//
// Only unauthenticated endpoints are used, so no API key or signing is
// involved. A non-success status is treated as a hard failure: the body is
// kept for logging but never parsed as candle data.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::SourceError;
use crate::market_data::{CandleSource, KlineRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Longest upstream error body we keep in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Binance REST API client for public market data.
#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `BinanceClient`.
    ///
    /// # Arguments
    /// * `base_url` — e.g. `https://api.binance.com` (trailing `/` is ignored).
    /// * `timeout`  — per-request timeout applied by the HTTP client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::Transport {
                endpoint: "client builder",
                source,
            })?;

        debug!(%base_url, "BinanceClient initialised");

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v3/klines (public — no signature required).
    ///
    /// Returns Binance's array-of-arrays payload untouched:
    ///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
    ///   [6] closeTime, [7] quoteAssetVolume, [8] numberOfTrades, ...
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(&self, req: &KlineRequest) -> Result<Value, SourceError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = req.limit.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", req.symbol.as_str()),
                ("interval", req.interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                endpoint: "GET /api/v3/klines",
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(error = %e, "failed to read Binance error body");
                    String::new()
                }
            };
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            warn!(status = status.as_u16(), %body, "Binance klines request rejected");
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        debug!(
            symbol = %req.symbol,
            interval = %req.interval,
            count = body.as_array().map(|a| a.len()).unwrap_or(0),
            "klines fetched"
        );
        Ok(body)
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn fetch_raw(&self, req: &KlineRequest) -> Result<Value, SourceError> {
        self.get_klines(req).await
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
