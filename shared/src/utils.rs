// Currency pair helpers shared by the engine and its HTTP surface.
use anyhow::{anyhow, Result};

/// Upper-cases and checks a six-letter pair code such as `eurusd`.
pub fn normalize_pair(raw: &str) -> Result<String> {
    let pair = raw.trim().to_uppercase();
    if pair.len() != 6 || !pair.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(anyhow!("Invalid currency pair '{}': expected six letters like EURUSD", raw));
    }
    Ok(pair)
}

/// Splits a normalized pair into (base, quote).
pub fn split_pair(pair: &str) -> Result<(&str, &str)> {
    if pair.len() != 6 || !pair.is_ascii() {
        return Err(anyhow!("Invalid currency pair '{}'", pair));
    }
    Ok(pair.split_at(3))
}
