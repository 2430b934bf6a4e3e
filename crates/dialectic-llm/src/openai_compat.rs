//! OpenAI-compatible chat-completions provider
//!
//! Every vendor in the catalog exposes a `/chat/completions` endpoint with the
//! OpenAI wire format, so one client covers them all.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::ProviderKind;
use crate::provider::{ChatMessage, LlmError, LlmProvider, LlmRequest, LlmResponse};

/// Chat-completions request format
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// Provider for one vendor's OpenAI-compatible endpoint
#[derive(Debug)]
pub struct OpenAiCompatProvider {
    kind: ProviderKind,
    api_key: String,
    /// Used when the request leaves `model` empty
    default_model: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiCompatProvider {
    /// Create a provider for a vendor at its standard endpoint
    pub fn new(kind: ProviderKind, api_key: &str) -> Self {
        Self {
            kind,
            api_key: api_key.to_string(),
            default_model: kind.models().first().copied().unwrap_or_default().to_string(),
            client: reqwest::Client::new(),
            base_url: kind.base_url().to_string(),
        }
    }

    /// Point at a different endpoint root (proxies, local servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_default_model(mut self, model: &str) -> Self {
        self.default_model = model.to_string();
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        match self.kind {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Groq => "groq",
        }
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.base_url);
        let model = if request.model.is_empty() {
            self.default_model.as_str()
        } else {
            request.model.as_str()
        };

        let body = CompletionRequest {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(LlmError::InvalidCredential(self.kind.to_string()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed(format!(
                "Status: {}, Body: {}",
                status, text
            )));
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content,
            model: api_response.model.unwrap_or_else(|| model.to_string()),
            tokens_used: api_response.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = CompletionRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: 0.7,
            max_tokens: 64,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["max_tokens"], 64);
    }

    #[test]
    fn test_response_tolerates_null_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
        assert!(parsed.model.is_none());
    }

    #[test]
    fn test_default_model_and_base_url() {
        let provider = OpenAiCompatProvider::new(ProviderKind::Groq, "k")
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.default_model, "llama-3.3-70b-versatile");
        assert_eq!(provider.name(), "groq");
    }
}
