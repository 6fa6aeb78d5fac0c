// Offline market data: bars read from `<dir>/<PAIR>_<TF>.csv`
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::{Candle, TimeFrame};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::market_data::{finalize_bars, parse_timestamp, MarketDataProvider};
use crate::error::EngineError;

pub struct CsvBarSource {
    dir: PathBuf,
}

impl CsvBarSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, pair: &str, timeframe: TimeFrame) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", pair, timeframe))
    }

    // CSV Header: time,open,high,low,close[,volume]
    // Example Row: 2024-01-05 16:45:00,1.0921,1.0925,1.0918,1.0923,1520
    pub fn load_candles_from_csv(file_path: &Path) -> Result<Vec<Candle>, EngineError> {
        let file = File::open(file_path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;
            let candle = Self::parse_record(&record, &headers)
                .map_err(|e| {
                    EngineError::CsvDataFormatError(format!("line {}: {}", line, e))
                })?;
            candles.push(candle);
        }
        Ok(candles)
    }

    fn parse_record(record: &StringRecord, headers: &StringRecord) -> Result<Candle> {
        let time_str = Self::get_field(record, headers, "time")
            .ok_or_else(|| anyhow!("Missing 'time' field"))?;
        let time = parse_timestamp(time_str)?;

        let price = |name: &str| -> Result<f64> {
            let raw = Self::get_field(record, headers, name)
                .ok_or_else(|| anyhow!("Missing '{}' field", name))?;
            Self::parse_finite(name, raw)
        };

        let volume = match Self::get_field(record, headers, "volume") {
            Some(raw) if !raw.is_empty() => Some(Self::parse_finite("volume", raw)?),
            _ => None,
        };

        Ok(Candle {
            time,
            open: price("open")?,
            high: price("high")?,
            low: price("low")?,
            close: price("close")?,
            volume,
        })
    }

    fn parse_finite(name: &str, raw: &str) -> Result<f64> {
        let value: f64 = raw
            .parse()
            .map_err(|e| anyhow!("Error parsing '{}' value '{}': {}", name, raw, e))?;
        if !value.is_finite() {
            return Err(anyhow!("'{}' value '{}' is not finite", name, raw));
        }
        Ok(value)
    }

    // Columns are looked up by header name so their order does not matter.
    fn get_field<'a>(
        record: &'a StringRecord,
        headers: &StringRecord,
        name: &str,
    ) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}

#[async_trait]
impl MarketDataProvider for CsvBarSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_bars(
        &self,
        pair: &str,
        timeframe: TimeFrame,
        limit: usize,
    ) -> Result<Vec<Candle>, EngineError> {
        let path = self.path_for(pair, timeframe);
        let missing = format!("No CSV data for {} {} at {}", pair, timeframe, path.display());

        let file_path = path.clone();
        let candles = tokio::task::spawn_blocking(move || {
            if !file_path.is_file() {
                return Err(EngineError::DataUnavailable(missing));
            }
            Self::load_candles_from_csv(&file_path)
        })
        .await
        .map_err(|e| anyhow!("CSV loader task failed: {}", e))??;

        let candles = finalize_bars(candles, limit);
        tracing::info!(
            symbol = %pair,
            ?timeframe,
            path = %path.display(),
            bars = candles.len(),
            "Loaded CSV market data"
        );
        Ok(candles)
    }
}
