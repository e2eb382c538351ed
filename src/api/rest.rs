// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   GET /api/health    liveness
//   GET /api/symbols   symbol picker list
//   GET /api/binance   raw kline passthrough (CORS proxy)
//   GET /api/quote     price, 24h change, RSI / EMA stack (json or text)
//
// CORS allows any origin for GET and OPTIONS so a browser page on another
// host can call the proxy directly.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Json, Query, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::market_data::{CandleSource, KlineRequest};
use crate::presentation::render_quote;
use crate::quote::{build_quote, QuoteSummary};
use crate::types::{RsiStatus, TrendStatus};

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/symbols", get(symbols))
        .route("/api/binance", get(binance_proxy))
        .route("/api/quote", get(quote))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Query parameters shared by the proxy and quote endpoints.
#[derive(Debug, Deserialize)]
struct KlineQuery {
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<u32>,
}

impl KlineQuery {
    fn into_request(self, defaults: KlineRequest) -> Result<KlineRequest, ApiError> {
        let req = KlineRequest {
            symbol: self.symbol.unwrap_or(defaults.symbol),
            interval: self.interval.unwrap_or(defaults.interval),
            limit: self.limit.unwrap_or(defaults.limit),
        };
        Ok(req.validate()?)
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Symbols
// =============================================================================

async fn symbols(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.symbols.clone())
}

// =============================================================================
// Kline proxy
// =============================================================================

async fn binance_proxy(
    State(state): State<Arc<AppState>>,
    query: Result<Query<KlineQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let req = query.into_request(KlineRequest::default())?;
    let raw = state.source.fetch_raw(&req).await?;

    debug!(symbol = %req.symbol, interval = %req.interval, "proxied klines");
    Ok(Json(raw).into_response())
}

// =============================================================================
// Quote
// =============================================================================

// Not `#[serde(flatten)]` over `KlineQuery`: urlencoded numbers do not
// survive flattening.
#[derive(Debug, Deserialize)]
struct QuoteQuery {
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<u32>,
    format: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    #[serde(flatten)]
    summary: QuoteSummary,
    rsi_status: Option<RsiStatus>,
    trend: Option<TrendStatus>,
    interval: String,
    candles: usize,
}

async fn quote(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QuoteQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let as_text = match query.format.as_deref() {
        None | Some("json") => false,
        Some("text") => true,
        Some(other) => return Err(ApiError::BadFormat(other.to_string())),
    };

    let defaults = KlineRequest {
        symbol: state.config.default_symbol().to_string(),
        interval: state.config.default_interval.clone(),
        limit: state.config.default_limit,
    };
    let kline = KlineQuery {
        symbol: query.symbol,
        interval: query.interval,
        limit: query.limit,
    };
    let req = kline.into_request(defaults)?;

    let candles = state.source.fetch_candles(&req).await?;
    let summary = build_quote(&req.symbol, &candles)?;

    info!(
        symbol = %summary.symbol,
        price = summary.current_price,
        change_24h = ?summary.change_24h,
        rsi14 = ?summary.indicators.rsi14,
        candles = candles.len(),
        "quote computed"
    );

    if as_text {
        let body = render_quote(&summary);
        return Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response());
    }

    Ok(Json(QuoteResponse {
        rsi_status: summary.indicators.rsi_status(),
        trend: summary.indicators.trend(),
        interval: req.interval,
        candles: candles.len(),
        summary,
    })
    .into_response())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::error::UPSTREAM_FAILURE;
    use crate::config::ServiceConfig;
    use crate::error::SourceError;

    /// In-memory source that records every request it sees.
    struct FakeSource {
        payload: Option<Value>,
        seen: Mutex<Vec<KlineRequest>>,
    }

    impl FakeSource {
        fn returning(payload: Value) -> Arc<Self> {
            Arc::new(Self {
                payload: Some(payload),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                payload: None,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> KlineRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CandleSource for FakeSource {
        async fn fetch_raw(&self, req: &KlineRequest) -> Result<Value, SourceError> {
            self.seen.lock().unwrap().push(req.clone());
            self.payload.clone().ok_or(SourceError::Status {
                status: 503,
                body: "maintenance".into(),
            })
        }
    }

    /// Binance-shaped payload with closes 1.0 ..= n.
    fn klines(n: usize) -> Value {
        let rows: Vec<Value> = (1..=n)
            .map(|i| {
                json!([
                    1_700_000_000_000_i64 + i as i64 * 3_600_000,
                    "1.0", "1.0", "1.0", format!("{i}.0"), "5.0",
                    0, "0", 0, "0", "0", "0"
                ])
            })
            .collect();
        Value::Array(rows)
    }

    fn app(source: Arc<FakeSource>) -> Router {
        router(Arc::new(AppState::new(ServiceConfig::default(), source)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = get(app(FakeSource::failing()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["status"], "ok");
    }

    #[tokio::test]
    async fn symbols_lists_configured_pairs() {
        let (status, body) = get(app(FakeSource::failing()), "/api/symbols").await;
        assert_eq!(status, StatusCode::OK);
        let v: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(v, vec!["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT"]);
    }

    #[tokio::test]
    async fn proxy_passes_payload_through_with_defaults() {
        let payload = json!([[1, "2", "3", "4", "5", "6", "extra"]]);
        let source = FakeSource::returning(payload.clone());
        let (status, body) = get(app(source.clone()), "/api/binance").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), payload);
        assert_eq!(source.last_request(), KlineRequest::default());
    }

    #[tokio::test]
    async fn proxy_forwards_params() {
        let source = FakeSource::returning(json!([]));
        let (status, _) = get(app(source.clone()), "/api/binance?symbol=ethusdt&interval=15m&limit=20").await;
        assert_eq!(status, StatusCode::OK);

        let req = source.last_request();
        assert_eq!(req.symbol, "ETHUSDT");
        assert_eq!(req.interval, "15m");
        assert_eq!(req.limit, 20);
    }

    #[tokio::test]
    async fn proxy_upstream_failure_is_500() {
        let (status, body) = get(app(FakeSource::failing()), "/api/binance").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["error"], UPSTREAM_FAILURE);
    }

    #[tokio::test]
    async fn proxy_rejects_bad_params() {
        let source = FakeSource::returning(json!([]));
        let (status, body) = get(app(source.clone()), "/api/binance?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("limit"), "{body}");

        let (status, _) = get(app(source.clone()), "/api/binance?interval=7m").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(source.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unparseable_limit_is_json_400() {
        let source = FakeSource::returning(json!([]));
        for uri in [
            "/api/binance?limit=abc",
            "/api/binance?limit=-5",
            "/api/quote?limit=abc",
            "/api/quote?limit=-5",
        ] {
            let (status, body) = get(app(source.clone()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let v: Value = serde_json::from_str(&body)
                .unwrap_or_else(|e| panic!("{uri}: body is not JSON ({e}): {body}"));
            let msg = v["error"].as_str().unwrap();
            assert!(msg.starts_with("invalid query string"), "{uri}: {msg}");
        }
        assert!(source.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn quote_json_has_summary_and_classification() {
        let source = FakeSource::returning(klines(100));
        let (status, body) = get(app(source.clone()), "/api/quote?symbol=BTCUSDT").await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["symbol"], "BTCUSDT");
        assert_eq!(v["currentPrice"], 100.0);
        let change = v["change24h"].as_f64().unwrap();
        assert!((change - (100.0 - 76.0) / 76.0 * 100.0).abs() < 1e-9);
        assert_eq!(v["indicators"]["rsi14"], 100.0);
        assert!(v["indicators"]["ema50"].is_number());
        assert_eq!(v["rsiStatus"], "Overbought");
        assert_eq!(v["trend"], "StrongUptrend");
        assert_eq!(v["candles"], 100);

        let req = source.last_request();
        assert_eq!(req.interval, "1h");
        assert_eq!(req.limit, 100);
    }

    #[tokio::test]
    async fn quote_short_series_reports_nulls() {
        let (status, body) = get(app(FakeSource::returning(klines(10))), "/api/quote").await;
        assert_eq!(status, StatusCode::OK);

        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["currentPrice"], 10.0);
        assert!(v["change24h"].is_null());
        assert!(v["indicators"]["rsi14"].is_null());
        assert!(v["indicators"]["ema9"].is_number());
        assert!(v["indicators"]["ema21"].is_null());
        assert!(v["rsiStatus"].is_null());
        assert!(v["trend"].is_null());
    }

    #[tokio::test]
    async fn quote_text_renders_na() {
        let (status, body) = get(app(FakeSource::returning(klines(10))), "/api/quote?format=text").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Symbol         BTCUSDT"), "{body}");
        assert!(body.contains("RSI (14)       N/A"), "{body}");
        assert!(body.contains("EMA (50)       N/A"), "{body}");
    }

    #[tokio::test]
    async fn quote_unknown_format_is_400() {
        let (status, _) = get(app(FakeSource::returning(klines(10))), "/api/quote?format=xml").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn quote_empty_series_is_422() {
        let (status, body) = get(app(FakeSource::returning(json!([]))), "/api/quote").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("empty"), "{body}");
    }

    #[tokio::test]
    async fn quote_malformed_series_is_422() {
        let payload = json!([[1_700_000_000_000_i64, "1", "1", "1", "oops", "1"]]);
        let (status, body) = get(app(FakeSource::returning(payload)), "/api/quote").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("entry 0"), "{body}");
    }

    #[tokio::test]
    async fn quote_upstream_failure_is_500() {
        let (status, body) = get(app(FakeSource::failing()), "/api/quote").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains(UPSTREAM_FAILURE));
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let resp = app(FakeSource::failing())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/binance")
                    .header(header::ORIGIN, "http://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let methods = resp.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("GET") && methods.contains("OPTIONS"), "{methods}");
    }
}
