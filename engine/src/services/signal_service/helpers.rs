// Helper functions for signal_service route handlers
use serde::Deserialize;
use shared::models::TimeFrame;
use shared::utils::normalize_pair;

use crate::error::EngineError;

pub const DEFAULT_PAIR: &str = "EURUSD";
pub const DEFAULT_TIMEFRAME: TimeFrame = TimeFrame::M15;

/// Query string of `GET /api/signal`. Unknown parameters (the page also
/// sends `capital` and `riskPercent`) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SignalQuery {
    pub pair: Option<String>,
    pub timeframe: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_signal_query(query: &SignalQuery) -> Result<(String, TimeFrame), EngineError> {
    let pair = match non_empty(&query.pair) {
        Some(raw) => normalize_pair(raw).map_err(|e| EngineError::BadRequest(e.to_string()))?,
        None => DEFAULT_PAIR.to_string(),
    };
    let timeframe = match non_empty(&query.timeframe) {
        Some(raw) => raw
            .parse::<TimeFrame>()
            .map_err(|e| EngineError::BadRequest(e.to_string()))?,
        None => DEFAULT_TIMEFRAME,
    };
    Ok((pair, timeframe))
}
