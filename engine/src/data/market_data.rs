// Market data provider seam and the bar-ordering rules every adapter applies
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::models::{Candle, TimeFrame};

use crate::error::EngineError;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Up to `limit` bars, ascending by time, all prices finite.
    async fn fetch_bars(
        &self,
        pair: &str,
        timeframe: TimeFrame,
        limit: usize,
    ) -> Result<Vec<Candle>, EngineError>;
}

/// Sorts by timestamp, drops duplicate timestamps (first wins) and keeps the
/// trailing `limit` bars.
pub fn finalize_bars(mut candles: Vec<Candle>, limit: usize) -> Vec<Candle> {
    candles.sort_by_key(|c| c.time);
    candles.dedup_by_key(|c| c.time);
    let excess = candles.len().saturating_sub(limit);
    candles.drain(..excess);
    candles
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or a bare `YYYY-MM-DD` date.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(anyhow!("Failed to parse timestamp '{}'", raw))
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a fixed series regardless of pair or timeframe.
    pub struct StaticBars {
        candles: Vec<Candle>,
        calls: AtomicUsize,
    }

    impl StaticBars {
        pub fn new(candles: Vec<Candle>) -> Self {
            Self {
                candles,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketDataProvider for StaticBars {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch_bars(
            &self,
            _pair: &str,
            _timeframe: TimeFrame,
            limit: usize,
        ) -> Result<Vec<Candle>, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(finalize_bars(self.candles.clone(), limit))
        }
    }
}
