use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::{QuoteError, RequestError, SeriesError, SourceError};

/// Body text returned for any upstream failure. The cause is logged, not sent.
pub const UPSTREAM_FAILURE: &str = "Failed to fetch data from Binance";

/// Unified error type for API responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] RequestError),
    #[error("invalid query string: {0}")]
    BadQuery(String),
    #[error("unsupported format '{0}', expected json or text")]
    BadFormat(String),
    #[error(transparent)]
    Upstream(#[from] SourceError),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl From<QuoteError> for ApiError {
    fn from(e: QuoteError) -> Self {
        match e {
            QuoteError::Source(e) => Self::Upstream(e),
            QuoteError::Series(e) => Self::Series(e),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::BadQuery(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(_) | Self::BadQuery(_) | Self::BadFormat(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::Upstream(e) => {
                error!(error = %e, "upstream kline fetch failed");
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE.to_string())
            }
            Self::Series(e) => {
                warn!(error = %e, "candle series rejected");
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
