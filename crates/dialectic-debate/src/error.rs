//! Error types for debate orchestration

use dialectic_core::ScenarioError;
use dialectic_llm::LlmError;
use thiserror::Error;

/// Everything that can stop a generation attempt.
///
/// None of these poison the session: after any error the transcript is as it
/// was before the attempt and the action may be retried.
#[derive(Debug, Error)]
pub enum DebateError {
    /// No usable provider or credential for a model; raised before any prompt is built
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The gateway rejected a request
    #[error("Error generating response from {model}: {source}")]
    Generation {
        model: String,
        #[source]
        source: LlmError,
    },

    #[error("Round {round} cannot run: {reason}")]
    RoundNotRunnable { round: u32, reason: String },

    #[error("A generation is already in progress")]
    Busy,

    /// The session was reset while the request was in flight; its result was dropped
    #[error("Result discarded: the debate was reset while generating")]
    Superseded,

    #[error("No model assigned to {0}")]
    MissingModel(&'static str),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(#[from] ScenarioError),
}

impl DebateError {
    /// Sort a gateway failure into the configuration or generation bucket
    pub fn from_gateway(model: &str, source: LlmError) -> Self {
        if source.is_configuration() {
            DebateError::Configuration(source.to_string())
        } else {
            DebateError::Generation {
                model: model.to_string(),
                source,
            }
        }
    }

    /// Whether retrying the same action can succeed without changing setup
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DebateError::Generation { .. } | DebateError::Busy | DebateError::Superseded
        )
    }
}
