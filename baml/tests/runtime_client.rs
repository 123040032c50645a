//! Integration tests for the runtime client.
//!
//! These tests use wiremock to stand in for the execution engine and verify
//! the request envelope, status handling, SSE decoding and cancellation.

use std::time::Duration;

use baml::{BamlFunction, BamlRuntime, CancellationToken, ClientError, RuntimeError, ValidationError};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize)]
struct ExtractParams {
    resume_text: String,
}

#[derive(Debug, PartialEq, Deserialize)]
struct Resume {
    name: String,
    years: i64,
}

impl BamlFunction for ExtractParams {
    const NAME: &'static str = "ExtractResume";
    const CLIENT: Option<&'static str> = Some("openai/gpt-4o");
    type Output = Resume;
}

fn runtime_for(server: &MockServer) -> BamlRuntime {
    BamlRuntime::with_base_url(&server.uri())
        .unwrap()
        .api_key("sk-test")
        .build()
        .unwrap()
}

fn sse(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream")
}

async fn collect<T>(stream: baml::BamlStream<'_, T>) -> Vec<Result<T, RuntimeError>> {
    stream.collect().await
}

#[tokio::test]
async fn test_call_posts_envelope_with_bearer_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "functionName": "ExtractResume",
            "parameters": { "resume_text": "Ada, 12 years" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "Ada", "years": 12 })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let params = ExtractParams {
        resume_text: "Ada, 12 years".to_string(),
    };

    let resume: Resume = runtime.call("ExtractResume", &params, None).await.unwrap();
    assert_eq!(
        resume,
        Resume {
            name: "Ada".to_string(),
            years: 12
        }
    );
}

#[tokio::test]
async fn test_call_function_uses_declared_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .and(body_json(json!({
            "functionName": "ExtractResume",
            "parameters": { "resume_text": "Grace" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "Grace", "years": 40 })),
        )
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let params = ExtractParams {
        resume_text: "Grace".to_string(),
    };

    let resume = runtime.call_function(&params, None).await.unwrap();
    assert_eq!(resume.years, 40);
}

#[tokio::test]
async fn test_call_non_success_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine exploded"))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let err = runtime
        .call::<_, String>("F", &json!({}), None)
        .await
        .unwrap_err();

    assert!(err.is_transport());
    match err {
        RuntimeError::Client(ClientError::HttpStatus { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "engine exploded");
        }
        other => panic!("Expected HttpStatus error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_call_null_body_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let err = runtime
        .call::<_, Resume>("ExtractResume", &json!({}), None)
        .await
        .unwrap_err();

    assert!(err.is_deserialization());
    assert!(matches!(
        err,
        RuntimeError::Validation(ValidationError::NullResult { ref function }) if function == "ExtractResume"
    ));
}

#[tokio::test]
async fn test_call_malformed_body_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let err = runtime
        .call::<_, String>("F", &json!({}), None)
        .await
        .unwrap_err();

    assert!(err.is_deserialization());
}

#[tokio::test]
async fn test_call_empty_name_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("unused")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let err = runtime
        .call::<_, String>("  ", &json!({}), None)
        .await
        .unwrap_err();

    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_call_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!("late"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let runtime = BamlRuntime::with_base_url(&mock_server.uri())
        .unwrap()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = runtime
        .call::<_, String>("Slow", &json!({}), None)
        .await
        .unwrap_err();

    match err {
        RuntimeError::Client(ClientError::Timeout { duration_ms }) => assert_eq!(duration_ms, 100),
        other => panic!("Expected Timeout error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_call_cancelled_while_in_flight() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!("late"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = runtime
        .call::<_, String>("Slow", &json!({}), Some(&token))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_stream_yields_data_until_done() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stream"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "functionName": "Story",
            "parameters": { "topic": "rust" },
            "stream": true
        })))
        .respond_with(sse("data: \"a\"\n\ndata: \"b\"\n\ndata: [DONE]\n\n"))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let items = collect(runtime.stream::<_, String>("Story", &json!({ "topic": "rust" }), None)).await;
    let items: Vec<String> = items.into_iter().map(Result::unwrap).collect();

    assert_eq!(items, vec!["a", "b"]);
}

#[tokio::test]
async fn test_stream_skips_framing_and_null_payloads() {
    let mock_server = MockServer::start().await;

    let body = "event: partial\nretry: 500\n\ndata: \"a\"\n\n: keep-alive\ndata: null\n\ndata: \"b\"\n\ndata: [DONE]\n\ndata: \"after\"\n\n";
    Mock::given(method("POST"))
        .and(path("/stream"))
        .respond_with(sse(body))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let items: Vec<String> = collect(runtime.stream("Story", &json!({}), None))
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(items, vec!["a", "b"]);
}

#[tokio::test]
async fn test_stream_without_sentinel_ends_cleanly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stream"))
        .respond_with(sse("data: 1\n\ndata: 2\n\n"))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let items: Vec<i64> = collect(runtime.stream("Count", &json!({}), None))
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(items, vec![1, 2]);
}

#[tokio::test]
async fn test_stream_structured_partials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stream"))
        .respond_with(sse(concat!(
            "data: {\"name\":\"Ada\",\"years\":1}\n\n",
            "data: {\"name\":\"Ada\",\"years\":12}\n\n",
            "data: [DONE]\n\n"
        )))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let params = ExtractParams {
        resume_text: "Ada".to_string(),
    };
    let items: Vec<Resume> = collect(runtime.stream_function(&params, None))
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(items.len(), 2);
    assert_eq!(items[1].years, 12);
}

#[tokio::test]
async fn test_stream_non_success_is_first_item() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let items = collect(runtime.stream::<_, String>("Story", &json!({}), None)).await;

    assert_eq!(items.len(), 1);
    let err = items.into_iter().next().unwrap().unwrap_err();
    assert!(err.is_transport());
    assert_eq!(
        match err {
            RuntimeError::Client(e) => e.status_code(),
            _ => None,
        },
        Some(503)
    );
}

#[tokio::test]
async fn test_stream_bad_payload_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stream"))
        .respond_with(sse("data: \"a\"\n\ndata: {broken\n\ndata: \"c\"\n\n"))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let items = collect(runtime.stream::<_, String>("Story", &json!({}), None)).await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "a");
    assert!(items[1].as_ref().unwrap_err().is_deserialization());
}

#[tokio::test]
async fn test_stream_empty_name_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(sse("data: [DONE]\n\n"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let items = collect(runtime.stream::<_, String>("", &json!({}), None)).await;

    assert_eq!(items.len(), 1);
    assert!(items[0].as_ref().unwrap_err().is_invalid_input());
}

#[tokio::test]
async fn test_stream_pre_cancelled_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(sse("data: \"a\"\n\ndata: [DONE]\n\n"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let token = CancellationToken::new();
    token.cancel();

    let items = collect(runtime.stream::<_, String>("Story", &json!({}), Some(token))).await;

    assert_eq!(items.len(), 1);
    assert!(items[0].as_ref().unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_stream_cancel_after_first_item() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stream"))
        .respond_with(sse("data: \"a\"\n\ndata: \"b\"\n\ndata: [DONE]\n\n"))
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let token = CancellationToken::new();
    let mut stream = runtime.stream::<_, String>("Story", &json!({}), Some(token.clone()));

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first, "a");

    token.cancel();

    let second = stream.next().await.unwrap();
    assert!(second.unwrap_err().is_cancelled());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_stream_is_lazy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(sse("data: [DONE]\n\n"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let runtime = runtime_for(&mock_server);
    let stream = runtime.stream::<_, String>("Story", &json!({}), None);
    drop(stream);
}
