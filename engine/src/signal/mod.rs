//! Model output → decision record.
//!
//! `extract` pulls a JSON object out of free-form text, `validate` checks it
//! and applies the confidence gate, `prompt` and `orchestrator` wrap the single
//! model round trip around them.

pub mod extract;
pub mod orchestrator;
pub mod prompt;
pub mod validate;

pub use orchestrator::{generate_signal, SignalInputs};

use crate::config::settings::DEFAULT_MIN_CONFIDENCE;

/// Per-call settings for orchestration, passed explicitly rather than read
/// from the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub model_api_key: Option<String>,
    pub min_confidence: f64,
    /// Trailing bars included in the prompt.
    pub prompt_window: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            model_api_key: None,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            prompt_window: 200,
        }
    }
}
