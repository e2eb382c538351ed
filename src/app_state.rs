// =============================================================================
// Application State — immutable after startup
// =============================================================================
//
// Each request is independent: handlers only read the config and call the
// candle source, so nothing here needs a lock.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::market_data::CandleSource;

pub struct AppState {
    pub config: ServiceConfig,
    pub source: Arc<dyn CandleSource>,
}

impl AppState {
    pub fn new(config: ServiceConfig, source: Arc<dyn CandleSource>) -> Self {
        Self { config, source }
    }
}
