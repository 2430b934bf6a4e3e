//! Model gateway: routes a model id to the provider that serves it

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{provider_for_model, ApiSetup, ProviderKind};
use crate::openai_compat::OpenAiCompatProvider;
use crate::provider::{ChatMessage, LlmError, LlmProvider, LlmRequest};

/// Anything that can turn a chat prompt into a model response
#[async_trait]
pub trait ResponseGateway: Send + Sync {
    /// Fail fast when `model` cannot be reached with the current setup
    fn check_model(&self, model: &str) -> Result<(), LlmError>;

    /// Send `messages` to `model` and return the response text
    async fn generate_response(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, LlmError>;
}

/// Gateway backed by per-vendor providers and optional per-model overrides
#[derive(Default)]
pub struct ModelGateway {
    providers: HashMap<ProviderKind, Arc<dyn LlmProvider>>,
    /// Exact-model routes, checked before the catalog
    models: HashMap<String, Arc<dyn LlmProvider>>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<_> = self.providers.keys().map(|k| k.to_string()).collect();
        providers.sort();
        let mut models: Vec<_> = self.models.keys().cloned().collect();
        models.sort();
        f.debug_struct("ModelGateway")
            .field("providers", &providers)
            .field("models", &models)
            .finish()
    }
}

impl ModelGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// One HTTP provider per vendor that has a key
    pub fn from_setup(setup: &ApiSetup) -> Self {
        let mut gateway = Self::new();
        for kind in setup.configured_providers() {
            if let Some(key) = setup.api_key(kind) {
                gateway = gateway.with_provider(kind, Arc::new(OpenAiCompatProvider::new(kind, key)));
            }
        }
        gateway
    }

    pub fn with_provider(mut self, kind: ProviderKind, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(kind, provider);
        self
    }

    /// Route one model id to a specific provider, catalog or not
    pub fn with_model(mut self, model: &str, provider: Arc<dyn LlmProvider>) -> Self {
        self.models.insert(model.to_string(), provider);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Provider that serves `model`
    pub fn resolve(&self, model: &str) -> Result<Arc<dyn LlmProvider>, LlmError> {
        if let Some(provider) = self.models.get(model) {
            return Ok(provider.clone());
        }
        let kind =
            provider_for_model(model).ok_or_else(|| LlmError::UnknownModel(model.to_string()))?;
        self.providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| LlmError::MissingCredential(kind.to_string()))
    }
}

#[async_trait]
impl ResponseGateway for ModelGateway {
    fn check_model(&self, model: &str) -> Result<(), LlmError> {
        self.resolve(model).map(|_| ())
    }

    async fn generate_response(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, LlmError> {
        let provider = self.resolve(model)?;

        let mut request = LlmRequest::new(model, messages);
        if let Some(t) = self.temperature {
            request.temperature = t;
        }
        if let Some(m) = self.max_tokens {
            request.max_tokens = m;
        }

        debug!(model, provider = provider.name(), turns = request.messages.len(), "Sending prompt");
        match provider.complete(request).await {
            Ok(response) => {
                debug!(
                    model,
                    latency_ms = response.latency_ms,
                    tokens = ?response.tokens_used,
                    "Received response"
                );
                Ok(response.content)
            }
            Err(e) => {
                warn!(model, error = %e, "Model request failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKeys, DebaterModels};
    use crate::mock::MockProvider;

    #[tokio::test]
    async fn test_override_wins_over_catalog() {
        let catalog = Arc::new(MockProvider::constant("catalog"));
        let pinned = Arc::new(MockProvider::constant("pinned"));
        let gateway = ModelGateway::new()
            .with_provider(ProviderKind::OpenAI, catalog.clone())
            .with_model("gpt-4o", pinned.clone());

        let out = gateway
            .generate_response("gpt-4o", vec![ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_eq!(out, "pinned");

        let out = gateway
            .generate_response("gpt-4o-mini", vec![ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_eq!(out, "catalog");
        assert_eq!(catalog.requests()[0].model, "gpt-4o-mini");
    }

    #[test]
    fn test_check_model_errors() {
        let gateway = ModelGateway::new();
        assert!(matches!(
            gateway.check_model("nope"),
            Err(LlmError::UnknownModel(_))
        ));
        let err = gateway.check_model("deepseek-chat").unwrap_err();
        assert_eq!(
            err.to_string(),
            "DeepSeek client not initialized. Please check your API key."
        );
    }

    #[test]
    fn test_from_setup_only_keyed_vendors() {
        let mut keys = ApiKeys::default();
        keys.set(ProviderKind::Groq, "gsk");
        let gateway = ModelGateway::from_setup(&ApiSetup::new(keys, DebaterModels::default()));
        assert!(gateway.check_model("llama-3.1-8b-instant").is_ok());
        assert!(gateway.check_model("gpt-4o").is_err());
    }

    #[tokio::test]
    async fn test_request_settings_applied() {
        let mock = Arc::new(MockProvider::constant("ok"));
        let gateway = ModelGateway::new()
            .with_model("custom", mock.clone())
            .with_temperature(0.0)
            .with_max_tokens(32);
        gateway
            .generate_response("custom", vec![ChatMessage::user("hi")])
            .await
            .unwrap();
        let seen = &mock.requests()[0];
        assert_eq!(seen.temperature, 0.0);
        assert_eq!(seen.max_tokens, 32);
    }
}
