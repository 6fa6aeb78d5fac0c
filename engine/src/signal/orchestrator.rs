// Single validated model round trip.
use shared::models::{Candle, IndicatorSnapshot, Signal, TimeFrame};

use super::prompt::build_prompt;
use super::validate::finalize_signal;
use super::SignalConfig;
use crate::error::EngineError;
use crate::llm::ModelProvider;

pub const MISSING_MODEL_KEY: &str = "Missing GOOGLE_API_KEY environment variable";

#[derive(Debug, Clone, Copy)]
pub struct SignalInputs<'a> {
    pub pair: &'a str,
    pub timeframe: TimeFrame,
    pub candles: &'a [Candle],
    pub indicators: &'a IndicatorSnapshot,
}

/// Fails with `ConfigError` before touching the provider when no key is
/// configured. Provider errors are returned unchanged; there is no retry.
pub async fn generate_signal(
    config: &SignalConfig,
    model: &dyn ModelProvider,
    inputs: SignalInputs<'_>,
) -> Result<Signal, EngineError> {
    let api_key = config
        .model_api_key
        .as_deref()
        .ok_or_else(|| EngineError::ConfigError(MISSING_MODEL_KEY.to_string()))?;

    let prompt = build_prompt(
        inputs.pair,
        inputs.timeframe,
        inputs.candles,
        inputs.indicators,
        config,
    )?;

    tracing::debug!(
        provider = model.name(),
        bars = inputs.candles.len(),
        "Requesting model decision"
    );
    let raw = model.generate(api_key, &prompt).await?;

    let signal = finalize_signal(&raw, inputs.pair, inputs.timeframe, config.min_confidence)?;
    tracing::info!(
        symbol = %signal.pair,
        timeframe = %signal.timeframe,
        action = %signal.action,
        confidence = signal.confidence,
        "Signal generated"
    );
    Ok(signal)
}
