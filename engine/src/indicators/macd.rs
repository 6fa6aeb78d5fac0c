// Moving Average Convergence/Divergence (MACD) indicator implementation
use super::{closes, ema::ema, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD line, signal line and histogram, all index-aligned with `values`.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);
    let line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal_line = ema(&line, signal);
    let histogram = line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();
    MacdSeries {
        line,
        signal: signal_line,
        histogram,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdComponent {
    Line,
    Signal,
    Histogram,
}

/// Exposes one MACD component as a calculator series.
pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
    component: MacdComponent,
}

impl Macd {
    pub fn new(component: MacdComponent) -> Self {
        let name = match component {
            MacdComponent::Line => "macd",
            MacdComponent::Signal => "macdSignal",
            MacdComponent::Histogram => "macdHistogram",
        };
        Self {
            name: name.to_string(),
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
            component,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let series = macd(&closes(data), self.fast, self.slow, self.signal);
        let values = match self.component {
            MacdComponent::Line => series.line,
            MacdComponent::Signal => series.signal,
            MacdComponent::Histogram => series.histogram,
        };
        values.into_iter().map(Some).collect()
    }
}
