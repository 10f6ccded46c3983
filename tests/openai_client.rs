//! Drives `OpenAiClient` against a local stand-in for the chat completions API.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use gap_analysis::{CompletionClient, CompletionError, Config, ConfigError, OpenAiClient};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Captured {
    last: Arc<Mutex<Option<(Option<String>, Value)>>>,
}

fn record(captured: &Captured, headers: &HeaderMap, body: Value) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *captured.last.lock().unwrap() = Some((auth, body));
}

async fn ok(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&captured, &headers, body);
    Json(json!({
        "id": "chatcmpl-test",
        "choices": [
            {"message": {"role": "assistant", "content": "\n  Missing: lifetimes.  \n"}, "finish_reason": "stop", "index": 0}
        ],
        "usage": {"prompt_tokens": 40, "completion_tokens": 5, "total_tokens": 45}
    }))
}

async fn limited(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&captured, &headers, body);
    (StatusCode::TOO_MANY_REQUESTS, "Rate limit reached")
}

async fn empty(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&captured, &headers, body);
    Json(json!({"id": "chatcmpl-empty", "choices": []}))
}

async fn garbage(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&captured, &headers, body);
    "this is not json"
}

async fn spawn_fake_api() -> (SocketAddr, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/ok/chat/completions", post(ok))
        .route("/limited/chat/completions", post(limited))
        .route("/empty/chat/completions", post(empty))
        .route("/garbage/chat/completions", post(garbage))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

fn client_for(addr: SocketAddr, path: &str) -> OpenAiClient {
    let base = format!("http://{addr}/{path}");
    let config = Config::from_lookup(|name| match name {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "OPENAI_API_BASE" => Some(base.clone()),
        _ => None,
    })
    .unwrap();
    OpenAiClient::new(&config).unwrap()
}

#[tokio::test]
async fn sends_expected_request_and_trims_reply() {
    let (addr, captured) = spawn_fake_api().await;
    let client = client_for(addr, "ok");

    let reply = client.request_completion("Topic: Rust").await.unwrap();
    assert_eq!(reply, "Missing: lifetimes.");

    let (auth, body) = captured.last.lock().unwrap().take().unwrap();
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-3.5-turbo");
    assert_eq!(body["max_tokens"], 200);
    assert_eq!(body["n"], 1);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(
        body["messages"][0]["content"],
        "You are an AI assistant that helps users identify gaps in learning material."
    );
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "Topic: Rust");
}

#[tokio::test]
async fn error_status_is_reported_with_body() {
    let (addr, _captured) = spawn_fake_api().await;
    let err = client_for(addr, "limited")
        .request_completion("prompt")
        .await
        .unwrap_err();

    match &err {
        CompletionError::Status { status, body } => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(body, "Rate limit reached");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_are_an_error() {
    let (addr, _captured) = spawn_fake_api().await;
    let err = client_for(addr, "empty")
        .request_completion("prompt")
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::NoChoices));
}

#[tokio::test]
async fn undecodable_body_is_an_error() {
    let (addr, _captured) = spawn_fake_api().await;
    let err = client_for(addr, "garbage")
        .request_completion("prompt")
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Malformed(_)));
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
    // Bind then drop to get a port nobody is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr, "ok")
        .request_completion("prompt")
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Transport(_)));
}

#[test]
fn startup_without_key_fails() {
    let err = Config::from_lookup(|_| None).unwrap_err();
    assert!(matches!(err, ConfigError::MissingApiKey));
}
