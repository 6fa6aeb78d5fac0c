// Average True Range (ATR) indicator implementation
use super::{sma::sma, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

pub const DEFAULT_PERIOD: usize = 14;

/// True range per bar. The first bar uses its own close as the previous
/// close, so every index is defined.
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let prev_close = if i > 0 { candles[i - 1].close } else { c.close };
            (c.high - c.low)
                .max((c.high - prev_close).abs())
                .max((c.low - prev_close).abs())
        })
        .collect()
}

pub fn atr(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    sma(&true_range(candles), period)
}

pub struct Atr {
    name: String,
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("atr{}", period),
            period,
        }
    }
}

impl IndicatorCalculator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        atr(data, self.period)
    }
}
