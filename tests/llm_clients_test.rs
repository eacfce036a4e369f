//! Integration tests for the HTTP generation backends against a mock server.

use autocommit::config::ProviderId;
use autocommit::error::BackendError;
use autocommit::llm::{
    ChatCompletionsClient, FALLBACK_MESSAGE, GeminiClient, GenerationBackend, GenerationOutcome,
    generate,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gemini(server: &MockServer) -> GeminiClient {
    GeminiClient::new(
        "gemini-key".to_string(),
        "gemini-2.5-flash".to_string(),
        Some(server.uri()),
    )
}

fn openai(server: &MockServer) -> ChatCompletionsClient {
    ChatCompletionsClient::new(
        ProviderId::OpenAi,
        "openai-key".to_string(),
        "gpt-4o-mini".to_string(),
        server.uri(),
    )
}

#[tokio::test]
async fn test_gemini_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "the prompt" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "feat: add greeting\n\n" }], "role": "model" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = generate(&gemini(&server), "the prompt").await;
    assert_eq!(outcome, GenerationOutcome::Generated("feat: add greeting".into()));
}

#[tokio::test]
async fn test_gemini_resource_exhausted_is_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let err = gemini(&server).complete("p").await.unwrap_err();
    assert!(err.is_quota());
    assert!(matches!(
        err,
        BackendError::Api { status: 429, ref code, .. } if code.as_deref() == Some("RESOURCE_EXHAUSTED")
    ));

    let outcome = generate(&gemini(&server), "p").await;
    assert!(matches!(outcome, GenerationOutcome::QuotaExhausted(_)));
}

#[tokio::test]
async fn test_gemini_server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let outcome = generate(&gemini(&server), "p").await;
    assert!(matches!(outcome, GenerationOutcome::OtherFailure(_)));
    assert_eq!(outcome.message_or_fallback().unwrap(), FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_gemini_without_candidates_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let outcome = generate(&gemini(&server), "p").await;
    assert!(matches!(outcome, GenerationOutcome::OtherFailure(_)));
}

#[tokio::test]
async fn test_chat_completions_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer openai-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "the prompt" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "fix: handle empty input" },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = generate(&openai(&server), "the prompt").await;
    assert_eq!(outcome, GenerationOutcome::Generated("fix: handle empty input".into()));
}

#[tokio::test]
async fn test_chat_completions_insufficient_quota_is_quota() {
    let server = MockServer::start().await;
    // Some gateways report exhausted credit with a non-429 status.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "message": "You exceeded your current quota.",
                "type": "insufficient_quota",
                "code": "insufficient_quota"
            }
        })))
        .mount(&server)
        .await;

    let outcome = generate(&openai(&server), "p").await;
    assert!(matches!(outcome, GenerationOutcome::QuotaExhausted(ref d) if d.contains("exceeded")));
}

#[tokio::test]
async fn test_chat_completions_auth_error_is_not_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided.",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let err = openai(&server).complete("p").await.unwrap_err();
    assert!(!err.is_quota());
    assert_eq!(
        generate(&openai(&server), "p").await.message_or_fallback().unwrap(),
        FALLBACK_MESSAGE
    );
}

#[tokio::test]
async fn test_chat_completions_null_content_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        })))
        .mount(&server)
        .await;

    let outcome = generate(&openai(&server), "p").await;
    assert!(matches!(outcome, GenerationOutcome::OtherFailure(_)));
}

#[tokio::test]
async fn test_zai_uses_chat_completions_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer zai-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "docs: update readme" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatCompletionsClient::new(
        ProviderId::Zai,
        "zai-key".to_string(),
        "glm-4.6".to_string(),
        server.uri(),
    );
    assert_eq!(client.provider(), ProviderId::Zai);
    assert_eq!(
        client.complete("p").await.unwrap().as_deref(),
        Some("docs: update readme")
    );
}
