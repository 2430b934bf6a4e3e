//! Integration tests for the model gateway
//!
//! Live tests are marked with #[ignore] and require environment variables:
//! - OPENAI_API_KEY for OpenAI tests
//! - DEEPSEEK_API_KEY for DeepSeek tests
//!
//! Run with: cargo test -p dialectic-llm --test llm_integration -- --ignored

use std::sync::Arc;

use dialectic_llm::{
    ApiSetup, ChatMessage, LlmError, LlmProvider, LlmRequest, MockProvider, ModelGateway,
    OpenAiCompatProvider, ProviderKind, ResponseGateway,
};

fn arithmetic_prompt() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a helpful assistant. Be extremely concise."),
        ChatMessage::user("What is 2 + 2? Answer with just the number."),
    ]
}

/// Test OpenAI through the gateway with the real API
#[tokio::test]
#[ignore = "Requires OPENAI_API_KEY"]
async fn test_openai_real_request() {
    let setup = ApiSetup::from_env();
    assert!(setup.is_configured(ProviderKind::OpenAI), "OPENAI_API_KEY must be set");

    let gateway = ModelGateway::from_setup(&setup).with_temperature(0.0);
    let reply = gateway
        .generate_response("gpt-4o-mini", arithmetic_prompt())
        .await;
    assert!(reply.is_ok(), "Request should succeed: {:?}", reply);
    assert!(reply.unwrap().contains('4'));
}

/// Test DeepSeek provider with real API
#[tokio::test]
#[ignore = "Requires DEEPSEEK_API_KEY"]
async fn test_deepseek_real_request() {
    let api_key =
        std::env::var("DEEPSEEK_API_KEY").expect("DEEPSEEK_API_KEY must be set for this test");
    let provider = OpenAiCompatProvider::new(ProviderKind::DeepSeek, &api_key);

    assert!(provider.is_available().await, "DeepSeek should be available");

    let mut request = LlmRequest::new("deepseek-chat", arithmetic_prompt());
    request.temperature = 0.0;
    request.max_tokens = 10;

    let response = provider.complete(request).await;
    assert!(response.is_ok(), "Request should succeed: {:?}", response);
    let response = response.unwrap();
    assert!(response.content.contains('4'));
    println!("Latency: {}ms, tokens: {:?}", response.latency_ms, response.tokens_used);
}

#[tokio::test]
async fn test_gateway_routes_by_vendor() {
    let openai = Arc::new(MockProvider::constant("from openai"));
    let groq = Arc::new(MockProvider::constant("from groq"));
    let gateway = ModelGateway::new()
        .with_provider(ProviderKind::OpenAI, openai.clone())
        .with_provider(ProviderKind::Groq, groq.clone());

    let a = gateway
        .generate_response("gpt-4o", arithmetic_prompt())
        .await
        .unwrap();
    let b = gateway
        .generate_response("mixtral-8x7b-32768", arithmetic_prompt())
        .await
        .unwrap();

    assert_eq!(a, "from openai");
    assert_eq!(b, "from groq");
    assert_eq!(openai.call_count(), 1);
    assert_eq!(groq.call_count(), 1);
    assert_eq!(groq.requests()[0].messages.len(), 2);
}

#[tokio::test]
async fn test_missing_vendor_is_configuration_error() {
    let gateway = ModelGateway::new();
    let err = gateway
        .generate_response("claude-3-5-haiku-20241022", arithmetic_prompt())
        .await
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, LlmError::MissingCredential(ref p) if p == "Anthropic"));
}

#[tokio::test]
async fn test_setup_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("setup.json");
    std::fs::write(
        &path,
        r#"{"apiKeys": {"DeepSeek": "sk-test"},
            "models": {"debaterA": "deepseek-chat", "debaterB": "deepseek-chat", "judge": "deepseek-chat"}}"#,
    )
    .unwrap();

    let setup = ApiSetup::from_file(&path).unwrap();
    assert!(setup.verify().is_ok());
    assert_eq!(setup.models.unique(), vec!["deepseek-chat"]);
}
