// engine/src/services/signal_service/mod.rs
// Request pipeline (fetch -> indicators -> model) and its HTTP routes.
// Handlers live in sibling modules, as one file per route.

use axum::routing::get;
use axum::{Json, Router};
use shared::models::{Signal, TimeFrame};
use std::sync::Arc;
use std::time::Duration;

use crate::config::settings::EngineSettings;
use crate::data::{AlphaVantageClient, CsvBarSource, MarketDataProvider};
use crate::error::EngineError;
use crate::indicators;
use crate::llm::{GeminiClient, ModelProvider};
use crate::signal::{generate_signal, SignalInputs};

pub mod generate_signal;
pub mod helpers;
pub mod page;

pub struct SignalEngine {
    market_data: Arc<dyn MarketDataProvider>,
    model: Arc<dyn ModelProvider>,
    settings: EngineSettings,
}

impl SignalEngine {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        model: Arc<dyn ModelProvider>,
        settings: EngineSettings,
    ) -> Self {
        SignalEngine {
            market_data,
            model,
            settings,
        }
    }

    /// CSV bars when `csv_data_dir` is set, Alpha Vantage otherwise; Gemini
    /// for the model.
    pub fn from_settings(settings: EngineSettings) -> Result<Self, EngineError> {
        let timeout = Duration::from_secs(settings.http_timeout_secs);
        let market_data: Arc<dyn MarketDataProvider> = match &settings.csv_data_dir {
            Some(dir) => Arc::new(CsvBarSource::new(dir.clone())),
            None => Arc::new(AlphaVantageClient::new(
                &settings.alpha_vantage_url,
                settings.market_data_api_key.clone(),
                timeout,
            )?),
        };
        let model = Arc::new(GeminiClient::new(&settings.gemini_url, &settings.model, timeout)?);
        Ok(Self::new(market_data, model, settings))
    }

    pub async fn generate(&self, pair: &str, timeframe: TimeFrame) -> Result<Signal, EngineError> {
        let candles = self
            .market_data
            .fetch_bars(pair, timeframe, self.settings.bars_limit)
            .await?;
        if candles.is_empty() {
            return Err(EngineError::DataUnavailable(format!(
                "{} returned no bars for {} {}",
                self.market_data.name(),
                pair,
                timeframe
            )));
        }

        let snapshot = indicators::standard_snapshot(&candles);
        let inputs = SignalInputs {
            pair,
            timeframe,
            candles: &candles,
            indicators: &snapshot,
        };
        generate_signal(&self.settings.signal_config(), self.model.as_ref(), inputs).await
    }
}

pub fn router(engine: Arc<SignalEngine>) -> Router {
    Router::new()
        .route("/", get(page::handle_index))
        .route("/api/signal", get(generate_signal::handle_generate_signal))
        .route("/health", get(health))
        .with_state(engine)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
