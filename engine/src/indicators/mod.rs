// Technical indicators module
pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use atr::Atr;
pub use ema::Ema;
pub use macd::{Macd, MacdComponent};
pub use rsi::Rsi;
pub use sma::Sma;

use serde_json::Value;
use shared::models::{Candle, IndicatorSnapshot};

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    /// Key under which the latest value appears in an `IndicatorSnapshot`.
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>>; // None where history is insufficient
}

pub(crate) fn closes(data: &[Candle]) -> Vec<f64> {
    data.iter().map(|c| c.close).collect()
}

/// The indicator set sent to the model with every request.
pub fn standard_calculators() -> Vec<Box<dyn IndicatorCalculator>> {
    vec![
        Box::new(Sma::new(20)),
        Box::new(Sma::new(50)),
        Box::new(Ema::new(20)),
        Box::new(Ema::new(50)),
        Box::new(Rsi::new(rsi::DEFAULT_PERIOD)),
        Box::new(Macd::new(MacdComponent::Line)),
        Box::new(Macd::new(MacdComponent::Signal)),
        Box::new(Atr::new(atr::DEFAULT_PERIOD)),
    ]
}

/// Final element of a series, dropped when undefined or non-finite.
pub fn latest_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten().filter(|v| v.is_finite())
}

pub fn compute_snapshot(
    candles: &[Candle],
    calculators: &[Box<dyn IndicatorCalculator>],
) -> IndicatorSnapshot {
    let mut snapshot = IndicatorSnapshot::new();
    for calculator in calculators {
        let value = latest_value(&calculator.calculate(candles));
        tracing::debug!(
            indicator = calculator.name(),
            parameters = %calculator.parameters(),
            ?value,
            "Computed indicator"
        );
        snapshot.insert(calculator.name(), value);
    }
    snapshot
}

pub fn standard_snapshot(candles: &[Candle]) -> IndicatorSnapshot {
    compute_snapshot(candles, &standard_calculators())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::Candle;

    /// Flat bar at `close`, `index` fifteen-minute steps after a fixed origin.
    pub fn create_candle(index: usize, close: f64) -> Candle {
        create_bar(index, close, close, close, close)
    }

    pub fn create_bar(index: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
        let origin = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        Candle {
            time: origin + Duration::minutes(15 * index as i64),
            open,
            high,
            low,
            close,
            volume: None,
        }
    }
}
