// Relative Strength Index (RSI) indicator implementation
use super::{closes, sma::sma, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

pub const DEFAULT_PERIOD: usize = 14;

/// RSI from simple (not Wilder-smoothed) averages of gains and losses.
///
/// The first slot is always `None` so the output lines up with `values`.
/// A window without losses reads exactly 100.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if values.is_empty() {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let avg_gain = sma(&gains, period);
    let avg_loss = sma(&losses, period);

    let mut results = Vec::with_capacity(values.len());
    results.push(None);
    results.extend(avg_gain.iter().zip(avg_loss.iter()).map(|pair| match pair {
        (Some(_), Some(loss)) if *loss == 0.0 => Some(100.0),
        (Some(gain), Some(loss)) => {
            let rs = gain / loss;
            Some(100.0 - (100.0 / (1.0 + rs)))
        }
        _ => None,
    }));
    results
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("rsi{}", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        rsi(&closes(data), self.period)
    }
}
