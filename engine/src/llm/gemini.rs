//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{ModelProvider, PromptMessage};
use crate::error::EngineError;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

fn build_request(prompt: &[PromptMessage]) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: prompt
            .iter()
            .map(|m| Content {
                role: &m.role,
                parts: vec![Part { text: &m.text }],
            })
            .collect(),
    }
}

/// Text of the first candidate, parts concatenated and trimmed.
fn response_text(response: GenerateContentResponse) -> Result<String, EngineError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::ProviderError("Gemini returned no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    Ok(text.trim().to_string())
}

#[async_trait]
impl ModelProvider for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        api_key: &str,
        prompt: &[PromptMessage],
    ) -> Result<String, EngineError> {
        debug!(model = %self.model, blocks = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::ProviderError(format!(
                "Gemini API error {}: {}",
                status.as_u16(),
                error_text.trim()
            )));
        }

        let data: GenerateContentResponse = response.json().await?;
        if let Some(usage) = &data.usage_metadata {
            info!(
                prompt_tokens = ?usage.prompt_token_count,
                completion_tokens = ?usage.candidates_token_count,
                "Gemini token usage"
            );
        }
        response_text(data)
    }
}
