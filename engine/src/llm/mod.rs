//! Language-model provider seam.
//!
//! The orchestrator only sees `ModelProvider`; the concrete HTTP client lives
//! in `gemini`. Providers return raw text with no guarantee of valid JSON.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One role-tagged block of the outbound prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub text: String,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            text: text.into(),
        }
    }
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Single round trip; implementations must not retry.
    async fn generate(
        &self,
        api_key: &str,
        prompt: &[PromptMessage],
    ) -> Result<String, EngineError>;
}
