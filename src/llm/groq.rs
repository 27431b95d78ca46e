//! Groq chat completions backend (OpenAI-compatible wire format).

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

use super::{ChatMessage, CompletionRequest, CompletionResponse, LlmConfig, LlmProvider};

const PROVIDER: &str = "groq";

/// Chat completions over Groq's OpenAI-compatible REST API.
pub struct GroqProvider {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    model: String,
}

impl GroqProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            model: config.model.clone(),
        })
    }
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = WireRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        provider: PROVIDER.to_string(),
                    }
                } else {
                    LlmError::RequestFailed {
                        provider: PROVIDER.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Any non-success status is a transport failure to the caller.
            return Err(LlmError::Http {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
            });
        }

        let parsed: WireResponse = response.json().await.map_err(|e| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: format!("Malformed completion body: {e}"),
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason: "Response contained no choices".to_string(),
            })?;

        tracing::debug!(
            input_tokens = parsed.usage.prompt_tokens,
            output_tokens = parsed.usage.completion_tokens,
            "Chat completion finished"
        );

        Ok(CompletionResponse {
            content: choice.message.content,
            input_tokens: parsed.usage.prompt_tokens,
            output_tokens: parsed.usage.completion_tokens,
        })
    }
}
