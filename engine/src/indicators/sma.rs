// Simple Moving Average (SMA) indicator implementation
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

/// Trailing mean over `period` values, kept as a running sum.
///
/// Indices before `period - 1` are `None`. A zero period yields an
/// all-`None` series rather than dividing by zero.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut results = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            results.push(Some(sum / period as f64));
        } else {
            results.push(None);
        }
    }
    results
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("sma{}", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        sma(&closes(data), self.period)
    }
}
