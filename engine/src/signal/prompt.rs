// Outbound prompt assembly.
use serde_json::json;
use shared::models::{Candle, IndicatorSnapshot, TimeFrame};

use super::SignalConfig;
use crate::error::EngineError;
use crate::llm::PromptMessage;

pub const SYSTEM_INSTRUCTIONS: &str = "You are an experienced FX trader. \
Generate a single JSON object with fields: action (buy|sell|hold), entry, stopLoss, \
takeProfit, confidence (0..1), rationale. Use conservative risk management. \
Avoid overtrading. If signal quality is low, output hold.";

pub const RISK_CONSTRAINT: &str = "prefer R>=1.5 with realistic SL/TP based on ATR";

/// Instruction block followed by the market payload as compact JSON.
pub fn build_prompt(
    pair: &str,
    timeframe: TimeFrame,
    candles: &[Candle],
    indicators: &IndicatorSnapshot,
    config: &SignalConfig,
) -> Result<Vec<PromptMessage>, EngineError> {
    let latest = candles.last().ok_or_else(|| {
        EngineError::DataUnavailable(format!("No bars available for {} {}", pair, timeframe))
    })?;
    let window = &candles[candles.len().saturating_sub(config.prompt_window)..];

    let payload = json!({
        "pair": pair,
        "timeframe": timeframe,
        "latest": latest,
        "indicators": indicators,
        "candles": window,
        "instructions": {
            "output": "strict-json",
            "constraints": {
                "risk": RISK_CONSTRAINT,
                "quality": config.min_confidence,
            }
        }
    });

    Ok(vec![
        PromptMessage::user(SYSTEM_INSTRUCTIONS),
        PromptMessage::user(payload.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::standard_snapshot;
    use crate::indicators::test_support::create_candle;
    use serde_json::Value;

    #[test]
    fn test_prompt_payload() {
        let candles: Vec<Candle> = (0..250)
            .map(|i| create_candle(i, 1.0 + i as f64 * 0.001))
            .collect();
        let snapshot = standard_snapshot(&candles);
        let config = SignalConfig {
            min_confidence: 0.65,
            ..SignalConfig::default()
        };
        let prompt = build_prompt("EURUSD", TimeFrame::M15, &candles, &snapshot, &config).unwrap();

        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[0].text, SYSTEM_INSTRUCTIONS);
        assert!(prompt.iter().all(|m| m.role == "user"));

        let payload: Value = serde_json::from_str(&prompt[1].text).unwrap();
        assert_eq!(payload["pair"], "EURUSD");
        assert_eq!(payload["timeframe"], "M15");
        assert_eq!(payload["candles"].as_array().unwrap().len(), 200);
        assert_eq!(payload["candles"][0]["close"], candles[50].close);
        assert_eq!(payload["latest"]["close"], candles[249].close);
        assert!(payload["indicators"]["sma20"].is_number());
        assert_eq!(payload["instructions"]["output"], "strict-json");
        assert_eq!(payload["instructions"]["constraints"]["quality"], 0.65);
        assert_eq!(payload["instructions"]["constraints"]["risk"], RISK_CONSTRAINT);
    }

    #[test]
    fn test_short_history_sends_everything() {
        let candles: Vec<Candle> = (0..10).map(|i| create_candle(i, 1.2)).collect();
        let snapshot = IndicatorSnapshot::new();
        let config = SignalConfig::default();
        let prompt = build_prompt("USDJPY", TimeFrame::H1, &candles, &snapshot, &config).unwrap();
        let payload: Value = serde_json::from_str(&prompt[1].text).unwrap();
        assert_eq!(payload["candles"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_empty_history_is_data_unavailable() {
        let snapshot = IndicatorSnapshot::new();
        let config = SignalConfig::default();
        let err = build_prompt("USDJPY", TimeFrame::H1, &[], &snapshot, &config).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)));
    }
}
