//! # Dialectic LLM
//!
//! Model access for debaters and judges.
//!
//! ## Supported Backends
//!
//! | Provider | Key |
//! |----------|-----|
//! | OpenAI | `OPENAI_API_KEY` |
//! | Anthropic | `ANTHROPIC_API_KEY` |
//! | Gemini | `GEMINI_API_KEY` |
//! | DeepSeek | `DEEPSEEK_API_KEY` |
//! | Groq | `GROQ_API_KEY` |
//! | Mock | None |
//!
//! All vendors are reached through their OpenAI-compatible chat endpoints.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use dialectic_llm::{ChatMessage, MockProvider, ModelGateway, ResponseGateway};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = ModelGateway::new()
//!         .with_model("local-test", Arc::new(MockProvider::constant("Answer: A")));
//!
//!     let reply = gateway
//!         .generate_response("local-test", vec![ChatMessage::user("Which answer?")])
//!         .await
//!         .unwrap();
//!     assert_eq!(reply, "Answer: A");
//! }
//! ```

pub mod config;
pub mod gateway;
pub mod mock;
pub mod openai_compat;
pub mod provider;

pub use config::{
    provider_for_model, ApiKeys, ApiSetup, ConfigError, DebaterModels, ProviderKind,
};
pub use gateway::{ModelGateway, ResponseGateway};
pub use mock::MockProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use provider::{ChatMessage, LlmError, LlmProvider, LlmRequest, LlmResponse, Role};
