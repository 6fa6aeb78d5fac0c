// Alpha Vantage FX_INTRADAY adapter
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::models::{Candle, TimeFrame};
use shared::utils::split_pair;
use std::time::Duration;

use super::market_data::{finalize_bars, parse_timestamp, MarketDataProvider};
use crate::error::EngineError;

pub const MISSING_KEY: &str = "Missing ALPHA_VANTAGE_KEY environment variable";

/// Intraday interval for a timeframe. Codes without an intraday equivalent
/// (H4, D1) fall back to 60 minutes.
pub fn interval_for(timeframe: TimeFrame) -> &'static str {
    match timeframe {
        TimeFrame::M1 => "1min",
        TimeFrame::M5 => "5min",
        TimeFrame::M15 => "15min",
        TimeFrame::M30 => "30min",
        TimeFrame::H1 => "60min",
        _ => "60min",
    }
}

pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key,
        })
    }
}

fn price_field(fields: &Value, key: &str) -> Result<f64> {
    let raw = fields
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("missing '{}'", key))?;
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("failed to parse '{}' value '{}'", key, raw))?;
    if !value.is_finite() {
        return Err(anyhow!("'{}' value '{}' is not finite", key, raw));
    }
    Ok(value)
}

fn parse_entry(time: &str, fields: &Value) -> Result<Candle> {
    Ok(Candle {
        time: parse_timestamp(time)?,
        open: price_field(fields, "1. open")?,
        high: price_field(fields, "2. high")?,
        low: price_field(fields, "3. low")?,
        close: price_field(fields, "4. close")?,
        volume: None,
    })
}

/// Turns an FX_INTRADAY body into ascending bars, keeping the last `limit`.
pub fn parse_time_series(
    body: &Value,
    interval: &str,
    limit: usize,
) -> Result<Vec<Candle>, EngineError> {
    let key_name = format!("Time Series FX ({})", interval);
    let series = match body.get(&key_name).and_then(Value::as_object) {
        Some(series) => series,
        None => {
            let detail = ["Error Message", "Note", "Information"]
                .iter()
                .find_map(|k| body.get(*k).and_then(Value::as_str));
            let message = match detail {
                Some(detail) => format!("AlphaVantage returned no time series data: {}", detail),
                None => "AlphaVantage returned no time series data".to_string(),
            };
            return Err(EngineError::DataUnavailable(message));
        }
    };

    let candles = series
        .iter()
        .map(|(time, fields)| {
            parse_entry(time, fields).map_err(|e| {
                EngineError::DataUnavailable(format!(
                    "AlphaVantage returned a malformed bar at {}: {}",
                    time, e
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(finalize_bars(candles, limit))
}

#[async_trait]
impl MarketDataProvider for AlphaVantageClient {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    async fn fetch_bars(
        &self,
        pair: &str,
        timeframe: TimeFrame,
        limit: usize,
    ) -> Result<Vec<Candle>, EngineError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EngineError::ConfigError(MISSING_KEY.to_string()))?;
        let (from, to) = split_pair(pair).map_err(|e| EngineError::BadRequest(e.to_string()))?;
        let interval = interval_for(timeframe);

        tracing::debug!(symbol = %pair, %interval, limit, "Requesting FX_INTRADAY series");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "FX_INTRADAY"),
                ("from_symbol", from),
                ("to_symbol", to),
                ("interval", interval),
                ("apikey", api_key),
                ("outputsize", "full"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::ProviderError(format!(
                "AlphaVantage error: {}",
                status.as_u16()
            )));
        }

        let body: Value = response.json().await?;
        let candles = parse_time_series(&body, interval, limit)?;
        tracing::info!(symbol = %pair, ?timeframe, bars = candles.len(), "Fetched market data");
        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bar(open: &str, high: &str, low: &str, close: &str) -> Value {
        json!({"1. open": open, "2. high": high, "3. low": low, "4. close": close})
    }

    #[test]
    fn test_interval_mapping() {
        assert_eq!(interval_for(TimeFrame::M1), "1min");
        assert_eq!(interval_for(TimeFrame::M15), "15min");
        assert_eq!(interval_for(TimeFrame::H1), "60min");
        assert_eq!(interval_for(TimeFrame::H4), "60min");
        assert_eq!(interval_for(TimeFrame::D1), "60min");
    }

    #[test]
    fn test_parse_time_series_sorts_and_trims() {
        let body = json!({
            "Meta Data": {"1. Information": "FX Intraday (15min) Time Series"},
            "Time Series FX (15min)": {
                "2024-01-05 16:45:00": bar("1.0921", "1.0925", "1.0918", "1.0923"),
                "2024-01-05 16:15:00": bar("1.0910", "1.0916", "1.0905", "1.0914"),
                "2024-01-05 16:30:00": bar("1.0914", "1.0922", "1.0911", "1.0921"),
            }
        });
        let candles = parse_time_series(&body, "15min", 2).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close, 1.0921);
        assert_eq!(candles[1].close, 1.0923);
        assert!(candles[0].time < candles[1].time);
        assert_eq!(candles[1].high, 1.0925);
        assert_eq!(candles[1].low, 1.0918);
    }

    #[test]
    fn test_missing_series_is_data_unavailable() {
        let body = json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API call frequency \
                     is 5 calls per minute."
        });
        let err = parse_time_series(&body, "15min", 400).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)));
        assert!(err.to_string().starts_with("AlphaVantage returned no time series data"));
        assert!(err.to_string().contains("5 calls per minute"));
    }

    #[test]
    fn test_wrong_interval_key_is_data_unavailable() {
        let body = json!({"Time Series FX (5min)": {}});
        let err = parse_time_series(&body, "15min", 400).unwrap_err();
        assert_eq!(err.to_string(), "AlphaVantage returned no time series data");
    }

    #[test]
    fn test_malformed_price_is_rejected() {
        let body = json!({
            "Time Series FX (60min)": {
                "2024-01-05 16:00:00": bar("1.09", "abc", "1.08", "1.085"),
            }
        });
        let err = parse_time_series(&body, "60min", 400).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)));
        assert!(err.to_string().contains("2. high"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        // Unroutable base URL: reaching the network would surface a provider error instead.
        let client =
            AlphaVantageClient::new("http://127.0.0.1:9/query", None, Duration::from_secs(1))
                .unwrap();
        let err = client.fetch_bars("EURUSD", TimeFrame::M15, 400).await.unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
        assert_eq!(err.to_string(), MISSING_KEY);
    }
}
