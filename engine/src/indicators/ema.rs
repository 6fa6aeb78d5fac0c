// Exponential Moving Average (EMA) indicator implementation
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

/// EMA with smoothing factor `2 / (period + 1)`.
///
/// The series is seeded with the first raw value instead of an SMA burn-in,
/// so every index is defined. Downstream snapshots depend on this seeding.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut results = Vec::with_capacity(values.len());
    let mut previous_ema = first;
    results.push(previous_ema);

    for value in &values[1..] {
        let ema = value * multiplier + previous_ema * (1.0 - multiplier);
        results.push(ema);
        previous_ema = ema;
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("ema{}", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        ema(&closes(data), self.period).into_iter().map(Some).collect()
    }
}
