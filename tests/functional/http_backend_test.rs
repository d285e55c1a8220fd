//! Functional tests for the HTTP generation client

use serde_json::json;
use snapcloset_backend::backend::traits::{GenerationClient, MessageContent, OutputBlock};
use snapcloset_backend::backend::HttpGenerationClient;
use snapcloset_backend::config::OpenAiConfig;
use snapcloset_backend::error::AppError;
use snapcloset_backend::styling::{PromptBuilder, StyleVariant};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, timeout_ms: u64) -> OpenAiConfig {
    OpenAiConfig {
        api_key: "sk-test".to_string(),
        base_url: format!("{}/v1/", server.uri()),
        model: "gpt-4.1".to_string(),
        chat_model: "gpt-4o".to_string(),
        temperature: 0.7,
        timeout_ms,
    }
}

#[tokio::test]
async fn test_generate_parses_output_blocks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4.1",
            "tools": [{"type": "image_generation"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "resp_abc",
            "model": "gpt-4.1-2025-04-14",
            "usage": {"input_tokens": 120, "output_tokens": 45, "total_tokens": 165},
            "output": [
                {"type": "image_generation_call", "id": "ig_1", "status": "completed", "result": "aGk="},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "Try a leather jacket", "annotations": []}
                ]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpGenerationClient::new(&config_for(&server, 5000)).unwrap();
    let payload = PromptBuilder::new("gpt-4.1", 0.7).build_one("fall", StyleVariant::Edgy, &[]);

    let response = client.generate(payload).await.unwrap();

    assert_eq!(response.id.as_deref(), Some("resp_abc"));
    assert_eq!(response.usage.unwrap()["total_tokens"], 165);
    assert_eq!(
        response.output,
        vec![
            OutputBlock::ImageGenerationCall {
                result: Some("aGk=".to_string())
            },
            OutputBlock::Message {
                content: vec![MessageContent::OutputText {
                    text: "Try a leather jacket".to_string()
                }]
            },
        ]
    );
}

#[tokio::test]
async fn test_error_status_becomes_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = HttpGenerationClient::new(&config_for(&server, 5000)).unwrap();
    let payload = PromptBuilder::new("gpt-4.1", 0.7).build_one("fall", StyleVariant::Cute, &[]);

    match client.generate(payload).await {
        Err(AppError::BackendError(message)) => {
            assert!(message.contains("429"));
            assert!(message.contains("slow down"));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"output": []}))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = HttpGenerationClient::new(&config_for(&server, 50)).unwrap();
    let payload = PromptBuilder::new("gpt-4.1", 0.7).build_one("fall", StyleVariant::Casual, &[]);

    assert!(matches!(
        client.generate(payload).await,
        Err(AppError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_malformed_body_is_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpGenerationClient::new(&config_for(&server, 5000)).unwrap();
    let payload = PromptBuilder::new("gpt-4.1", 0.7).build_one("fall", StyleVariant::Preppy, &[]);

    assert!(matches!(
        client.generate(payload).await,
        Err(AppError::BackendError(_))
    ));
}
