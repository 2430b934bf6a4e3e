//! Mock LLM provider for testing

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns predefined responses
/// and records every request it receives
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    /// Canned responses (cycles through them)
    responses: Vec<String>,
    /// Current response index
    index: AtomicUsize,
    /// Outcomes consumed before falling back to `responses`
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Every request seen, in arrival order
    requests: Mutex<Vec<LlmRequest>>,
    /// Simulated latency in ms
    latency_ms: u64,
}

impl MockProvider {
    /// Create a new mock provider with given responses
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            name: "mock".to_string(),
            responses,
            index: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            latency_ms: 0,
        }
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a mock that plays `outcomes` in order, then answers smartly
    pub fn scripted(outcomes: Vec<Result<String, LlmError>>) -> Self {
        let mock = Self::smart();
        *lock(&mock.script) = outcomes.into();
        mock
    }

    /// Create a mock whose every call fails with `error`
    pub fn failing(error: LlmError) -> Self {
        let mut mock = Self::new(vec![]);
        mock.name = "failing-mock".to_string();
        *lock(&mock.script) = std::iter::repeat_n(Err(error), 1024).collect();
        mock
    }

    /// Create a smart mock whose first `n` calls fail
    pub fn fail_first(n: usize, error: LlmError) -> Self {
        Self::scripted((0..n).map(|_| Err(error.clone())).collect())
    }

    /// Create a smart mock that responds based on prompt content
    pub fn smart() -> Self {
        let mut mock = Self::new(vec![]);
        mock.name = "smart-mock".to_string();
        mock
    }

    /// Simulate network latency on every call
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<LlmRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn generate_smart_response(&self, request: &LlmRequest) -> String {
        let system = request.system().unwrap_or_default();
        let user = request.last_user().unwrap_or_default();

        // Judge
        if system.contains("expert judge") {
            return "<thinking>Debater A relies on verified quotes; \
                    Debater B's key claims are unverified.</thinking>\n\
                    Answer: A"
                .to_string();
        }

        // Debater turn
        if let Some(name) = debater_name(system) {
            let quote = first_sentence(&tag_body(user, "situation").unwrap_or_default());
            let cited = if quote.is_empty() {
                String::new()
            } else {
                format!(" The situation states <quote>{}</quote>.", quote)
            };
            return format!(
                "<thinking>{} plans the next point.</thinking>\n\
                 <argument>{} maintains its position.{}</argument>",
                name, name, cited
            );
        }

        // Baseline
        if user.contains("Answer:") {
            return "<thinking>The rules chain together.</thinking>\nAnswer: A".to_string();
        }

        format!(
            "I understand you're asking about: \"{}\"",
            user.chars().take(50).collect::<String>()
        )
    }
}

/// Lock that survives a panicked holder; test data stays readable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn debater_name(system: &str) -> Option<&str> {
    let rest = system.split("debater named ").nth(1)?;
    rest.split_whitespace()
        .next()
        .map(|word| word.trim_end_matches(|c: char| !c.is_alphanumeric()))
}

fn tag_body(text: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(text[start..end].trim().to_string())
}

fn first_sentence(text: &str) -> String {
    text.split(['.', '\n'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        true // Mock is always available
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        lock(&self.requests).push(request.clone());

        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }

        let scripted = lock(&self.script).pop_front();
        let content = match scripted {
            Some(outcome) => outcome?,
            None if self.responses.is_empty() => self.generate_smart_response(&request),
            None => {
                // Cycle through canned responses
                let idx = self.index.fetch_add(1, Ordering::Relaxed);
                self.responses[idx % self.responses.len()].clone()
            }
        };

        let prompt_len: usize = request.messages.iter().map(|m| m.content.len()).sum();
        Ok(LlmResponse {
            content,
            model: if request.model.is_empty() {
                self.name.clone()
            } else {
                request.model.clone()
            },
            tokens_used: Some((prompt_len / 4) as u32 + 100),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatMessage;

    #[tokio::test]
    async fn test_mock_provider() {
        let mock = MockProvider::constant("Hello, world!");
        let response = mock.ask("test").await.unwrap();
        assert_eq!(response, "Hello, world!");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_then_smart() {
        let mock = MockProvider::fail_first(1, LlmError::RateLimited);
        assert!(matches!(mock.ask("x").await, Err(LlmError::RateLimited)));
        assert!(mock.ask("x").await.is_ok());
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_smart_debater_quotes_situation() {
        let mock = MockProvider::smart();
        let request = LlmRequest::new(
            "m",
            vec![
                ChatMessage::system("You will act as an expert debater named A engaging in a debate"),
                ChatMessage::user("<situation>\nThe dog barks. The cat sleeps.\n</situation>"),
            ],
        );
        let response = mock.complete(request).await.unwrap();
        assert!(response.content.contains("<argument>A maintains"));
        assert!(response.content.contains("<quote>The dog barks</quote>"));
        assert_eq!(response.model, "m");
    }

    #[tokio::test]
    async fn test_smart_judge() {
        let mock = MockProvider::smart();
        let request = LlmRequest::new(
            "j",
            vec![ChatMessage::system("You are an expert judge"), ChatMessage::user("...")],
        );
        let response = mock.complete(request).await.unwrap();
        assert!(response.content.ends_with("Answer: A"));
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockProvider::failing(LlmError::NotAvailable);
        assert!(mock.ask("a").await.is_err());
        assert!(mock.ask("b").await.is_err());
    }
}
