//! # Dialectic Debate
//!
//! Orchestration for evidence-blind LLM debates.
//!
//! Two debaters argue opposite answers to a reasoning question with access
//! to a private situation. A judge who never sees the situation picks the
//! winner from the debaters' arguments and the verified/unverified status
//! of their quotes.
//!
//! - [`PromptGenerator`]: baseline, debater (four-turn) and judge prompts
//! - [`StructuredDebate`]: which round may run and when the debate is over
//! - [`DebateOrchestrator`]: sequential A-then-B generation with a
//!   stale-result guard
//!
//! ```rust
//! use std::sync::Arc;
//! use dialectic_core::Scenario;
//! use dialectic_debate::{DebateOrchestrator, JudgeStyle};
//! use dialectic_llm::{DebaterModels, MockProvider, ModelGateway};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = ModelGateway::new().with_model("mock", Arc::new(MockProvider::smart()));
//!     let scenario = Scenario::new(
//!         "1",
//!         "Birds fly. Tweety is a bird.",
//!         "Is it proved that Tweety flies?",
//!         &["proved", "disproved"],
//!         "proved",
//!     );
//!     let debate = DebateOrchestrator::new(
//!         Arc::new(gateway),
//!         scenario,
//!         DebaterModels::new("mock", "mock", "mock"),
//!     )
//!     .unwrap();
//!
//!     debate.run_round(1).await.unwrap();
//!     let verdict = debate.judge(JudgeStyle::Standard).await.unwrap();
//!     assert!(verdict.verdict.is_some());
//! }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod prompts;
pub mod rounds;

pub use config::DebateConfig;
pub use error::DebateError;
pub use generator::{answer_label, fill, PromptGenerator};
pub use orchestrator::{DebateOrchestrator, DebateSession, Phase};
pub use prompts::{
    BaselinePrompts, DebatePrompts, JudgeStyle, JudgementPrompts, PromptSet, RoundGuidance,
    UnstructuredPrompts,
};
pub use rounds::{round_label, RoundBlock, StructuredDebate, UnstructuredDebate};
