//! API setup: provider credentials and role → model assignment
//!
//! Handles API keys, the fixed model catalog, and loading from the
//! environment or a JSON file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid model selected: {0}")]
    UnknownModel(String),
    #[error("Model {model} needs a {provider} API key")]
    MissingCredential { model: String, provider: ProviderKind },
    #[error("No model assigned to {0}")]
    Unassigned(&'static str),
    #[error("Failed to read setup file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse setup file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Model vendors reachable through the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Gemini,
    DeepSeek,
    Groq,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::DeepSeek,
        ProviderKind::Groq,
    ];

    /// Environment variable holding this provider's key
    pub fn env_var(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
        }
    }

    /// Chat-completions compatible endpoint root
    pub fn base_url(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            ProviderKind::DeepSeek => "https://api.deepseek.com/v1",
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Models offered for this provider
    pub fn models(self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAI => &["o1", "o1-mini", "gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"],
            ProviderKind::Anthropic => &[
                "claude-3-5-sonnet-20241022",
                "claude-3-5-haiku-20241022",
                "claude-3-opus-20240229",
                "claude-2.1",
            ],
            ProviderKind::Gemini => &[
                "gemini-1.5-pro",
                "gemini-2.0-flash-exp",
                "gemini-1.5-flash",
                "gemini-1.5-flash-8b",
            ],
            ProviderKind::DeepSeek => &["deepseek-chat"],
            ProviderKind::Groq => &[
                "llama-3.3-70b-versatile",
                "llama-3.1-8b-instant",
                "mixtral-8x7b-32768",
            ],
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::DeepSeek => "DeepSeek",
            ProviderKind::Groq => "Groq",
        };
        f.write_str(name)
    }
}

/// Catalog lookup: which provider serves a model id
pub fn provider_for_model(model: &str) -> Option<ProviderKind> {
    ProviderKind::ALL
        .into_iter()
        .find(|kind| kind.models().contains(&model))
}

/// Per-provider API keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(rename = "OpenAI", default)]
    pub openai: String,
    #[serde(rename = "Anthropic", default)]
    pub anthropic: String,
    #[serde(rename = "Gemini", default)]
    pub gemini: String,
    #[serde(rename = "DeepSeek", default)]
    pub deepseek: String,
    #[serde(rename = "Groq", default)]
    pub groq: String,
}

impl ApiKeys {
    fn slot(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::OpenAI => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::DeepSeek => &self.deepseek,
            ProviderKind::Groq => &self.groq,
        }
    }

    fn slot_mut(&mut self, kind: ProviderKind) -> &mut String {
        match kind {
            ProviderKind::OpenAI => &mut self.openai,
            ProviderKind::Anthropic => &mut self.anthropic,
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::DeepSeek => &mut self.deepseek,
            ProviderKind::Groq => &mut self.groq,
        }
    }

    /// Trimmed key, `None` when blank
    pub fn get(&self, kind: ProviderKind) -> Option<&str> {
        Some(self.slot(kind).trim()).filter(|k| !k.is_empty())
    }

    pub fn set(&mut self, kind: ProviderKind, key: &str) {
        *self.slot_mut(kind) = key.trim().to_string();
    }
}

/// Models assigned to the debate roles; empty means unassigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebaterModels {
    #[serde(rename = "debaterA", alias = "debater_a", default)]
    pub debater_a: String,
    #[serde(rename = "debaterB", alias = "debater_b", default)]
    pub debater_b: String,
    #[serde(default)]
    pub judge: String,
}

impl DebaterModels {
    pub fn new(debater_a: &str, debater_b: &str, judge: &str) -> Self {
        Self {
            debater_a: debater_a.to_string(),
            debater_b: debater_b.to_string(),
            judge: judge.to_string(),
        }
    }

    /// Both debaters have a model
    pub fn debaters_assigned(&self) -> bool {
        !self.debater_a.trim().is_empty() && !self.debater_b.trim().is_empty()
    }

    /// Distinct assigned models in role order (A, B, judge)
    pub fn unique(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for model in [&self.debater_a, &self.debater_b, &self.judge] {
            let model = model.trim();
            if !model.is_empty() && !out.contains(&model) {
                out.push(model);
            }
        }
        out
    }

    fn assigned(&self) -> [(&'static str, &str); 3] {
        [
            ("debater A", self.debater_a.trim()),
            ("debater B", self.debater_b.trim()),
            ("judge", self.judge.trim()),
        ]
    }
}

/// Credentials plus role → model assignment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSetup {
    #[serde(rename = "apiKeys", alias = "api_keys", default)]
    pub api_keys: ApiKeys,
    #[serde(default)]
    pub models: DebaterModels,
}

impl ApiSetup {
    pub fn new(api_keys: ApiKeys, models: DebaterModels) -> Self {
        Self { api_keys, models }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut api_keys = ApiKeys::default();
        for kind in ProviderKind::ALL {
            if let Ok(key) = env::var(kind.env_var()) {
                api_keys.set(kind, &key);
            }
        }
        Self {
            api_keys,
            models: DebaterModels {
                debater_a: env::var("DIALECTIC_DEBATER_A").unwrap_or_default(),
                debater_b: env::var("DIALECTIC_DEBATER_B").unwrap_or_default(),
                judge: env::var("DIALECTIC_JUDGE").unwrap_or_default(),
            },
        }
    }

    /// Load from a JSON file (`{"apiKeys": {...}, "models": {...}}`)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Fill blank keys and models from `other`
    pub fn merge_missing(mut self, other: &ApiSetup) -> Self {
        for kind in ProviderKind::ALL {
            if self.api_keys.get(kind).is_none() {
                if let Some(key) = other.api_keys.get(kind) {
                    self.api_keys.set(kind, key);
                }
            }
        }
        let fill = |mine: &mut String, theirs: &str| {
            if mine.trim().is_empty() {
                *mine = theirs.to_string();
            }
        };
        fill(&mut self.models.debater_a, &other.models.debater_a);
        fill(&mut self.models.debater_b, &other.models.debater_b);
        fill(&mut self.models.judge, &other.models.judge);
        self
    }

    /// Get API key for a provider
    pub fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        self.api_keys.get(kind)
    }

    /// Check if a provider is configured
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.api_key(kind).is_some()
    }

    /// Providers with a key
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|k| self.is_configured(*k))
            .collect()
    }

    /// Every assigned model resolves to a provider that has a key
    pub fn verify(&self) -> Result<(), ConfigError> {
        for (role, model) in self.models.assigned() {
            if model.is_empty() {
                return Err(ConfigError::Unassigned(role));
            }
            let provider =
                provider_for_model(model).ok_or_else(|| ConfigError::UnknownModel(model.to_string()))?;
            if !self.is_configured(provider) {
                return Err(ConfigError::MissingCredential {
                    model: model.to_string(),
                    provider,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(provider_for_model("gpt-4o"), Some(ProviderKind::OpenAI));
        assert_eq!(provider_for_model("deepseek-chat"), Some(ProviderKind::DeepSeek));
        assert_eq!(provider_for_model("mixtral-8x7b-32768"), Some(ProviderKind::Groq));
        assert_eq!(provider_for_model("not-a-model"), None);
    }

    #[test]
    fn test_blank_keys_are_absent() {
        let mut keys = ApiKeys::default();
        keys.set(ProviderKind::Groq, "   ");
        assert_eq!(keys.get(ProviderKind::Groq), None);
        keys.set(ProviderKind::Groq, " gsk_123 ");
        assert_eq!(keys.get(ProviderKind::Groq), Some("gsk_123"));
    }

    #[test]
    fn test_verify() {
        let mut setup = ApiSetup::new(
            ApiKeys::default(),
            DebaterModels::new("gpt-4o", "deepseek-chat", "gpt-4o-mini"),
        );
        assert!(matches!(
            setup.verify(),
            Err(ConfigError::MissingCredential {
                provider: ProviderKind::OpenAI,
                ..
            })
        ));

        setup.api_keys.set(ProviderKind::OpenAI, "sk-1");
        setup.api_keys.set(ProviderKind::DeepSeek, "sk-2");
        assert!(setup.verify().is_ok());

        setup.models.judge = "mystery".to_string();
        assert!(matches!(setup.verify(), Err(ConfigError::UnknownModel(_))));

        setup.models.judge.clear();
        assert!(matches!(setup.verify(), Err(ConfigError::Unassigned("judge"))));
    }

    #[test]
    fn test_unique_models() {
        let models = DebaterModels::new("gpt-4o", "gpt-4o", "deepseek-chat");
        assert_eq!(models.unique(), vec!["gpt-4o", "deepseek-chat"]);
        assert!(models.debaters_assigned());
        assert!(!DebaterModels::new("gpt-4o", "", "").debaters_assigned());
    }

    #[test]
    fn test_json_layout() {
        let json = r#"{
            "apiKeys": {"OpenAI": "sk-x", "Groq": ""},
            "models": {"debaterA": "gpt-4o", "debaterB": "gpt-4o-mini", "judge": "o1"}
        }"#;
        let setup: ApiSetup = serde_json::from_str(json).unwrap();
        assert_eq!(setup.configured_providers(), vec![ProviderKind::OpenAI]);
        assert_eq!(setup.models.debater_b, "gpt-4o-mini");
    }

    #[test]
    fn test_merge_missing() {
        let mut file = ApiSetup::default();
        file.models.debater_a = "gpt-4o".to_string();
        let mut env = ApiSetup::default();
        env.api_keys.set(ProviderKind::OpenAI, "sk-env");
        env.models.debater_a = "o1".to_string();
        env.models.judge = "gpt-4o-mini".to_string();

        let merged = file.merge_missing(&env);
        assert_eq!(merged.models.debater_a, "gpt-4o");
        assert_eq!(merged.models.judge, "gpt-4o-mini");
        assert_eq!(merged.api_key(ProviderKind::OpenAI), Some("sk-env"));
    }
}
