// Structural validation, confidence gate and stamping of model proposals.
use chrono::Utc;
use serde_json::{Map, Value};
use shared::models::{Action, Signal, TimeFrame};

use super::extract::extract_json;
use crate::error::EngineError;

/// A structurally valid model answer, before request fields are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub action: Action,
    pub entry: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub confidence: f64,
    pub rationale: String,
}

fn nullable_price(
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<f64>, EngineError> {
    match object.get(field) {
        Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| EngineError::validation(format!("'{}' is not a finite number", field))),
        Some(other) => Err(EngineError::validation(format!(
            "'{}' must be a number or null, got {}",
            field, other
        ))),
        None => Err(EngineError::validation(format!("'{}' is missing", field))),
    }
}

pub fn validate_proposal(value: &Value) -> Result<Proposal, EngineError> {
    let object = value
        .as_object()
        .ok_or_else(|| EngineError::validation("model output is not a JSON object"))?;

    let action = object
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::validation("'action' is missing or not a string"))?
        .parse::<Action>()
        .map_err(|e| EngineError::validation(e.to_string()))?;

    let entry = nullable_price(object, "entry")?;
    let stop_loss = nullable_price(object, "stopLoss")?;
    let take_profit = nullable_price(object, "takeProfit")?;

    let confidence = object
        .get("confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| EngineError::validation("'confidence' is missing or not a number"))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(EngineError::validation(format!(
            "'confidence' {} is outside [0, 1]",
            confidence
        )));
    }

    let rationale = match object.get("rationale").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => return Err(EngineError::validation("'rationale' is missing or empty")),
    };

    Ok(Proposal {
        action,
        entry,
        stop_loss,
        take_profit,
        confidence,
        rationale,
    })
}

/// Unless confidence reaches `min_confidence` the action becomes `hold`; an
/// incomparable (NaN) threshold holds too. Price levels are left as the model
/// proposed them.
pub fn apply_confidence_gate(mut proposal: Proposal, min_confidence: f64) -> Proposal {
    let passes = proposal.confidence >= min_confidence;
    if !passes && proposal.action != Action::Hold {
        tracing::info!(
            proposed = %proposal.action,
            confidence = proposal.confidence,
            min_confidence,
            "Confidence below threshold, forcing hold"
        );
        proposal.action = Action::Hold;
    }
    proposal
}

pub fn stamp(proposal: Proposal, pair: &str, timeframe: TimeFrame) -> Signal {
    Signal {
        pair: pair.to_string(),
        timeframe,
        action: proposal.action,
        entry: proposal.entry,
        stop_loss: proposal.stop_loss,
        take_profit: proposal.take_profit,
        confidence: proposal.confidence,
        rationale: proposal.rationale,
        generated_at: Utc::now(),
    }
}

/// extract → validate → gate → stamp.
pub fn finalize_signal(
    raw: &str,
    pair: &str,
    timeframe: TimeFrame,
    min_confidence: f64,
) -> Result<Signal, EngineError> {
    let value = extract_json(raw);
    let proposal = validate_proposal(&value).map_err(|err| {
        if let EngineError::ValidationError { detail } = &err {
            tracing::warn!(%detail, raw_len = raw.len(), "Rejected model output");
        }
        err
    })?;
    Ok(stamp(apply_confidence_gate(proposal, min_confidence), pair, timeframe))
}
