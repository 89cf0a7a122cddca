//! OpenAiChat against an in-process completions endpoint.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use notemail_rs_llm::{ChatProvider, ChatRequest, LlmError, OpenAiChat, OpenAiChatOptions};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<(String, Value)>>,
}

async fn completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let model = body["model"].as_str().unwrap_or_default().to_string();
    state.requests.lock().push((auth, body));
    match model.as_str() {
        "broken" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": { "message": "rate limited" } })),
        ),
        "silent" => (StatusCode::OK, Json(json!({ "choices": [] }))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "choices": [{ "index": 0, "message": { "role": "assistant", "content": "  hello Alice \n" } }]
            })),
        ),
    }
}

async fn spawn_mock() -> (String, Arc<MockState>) {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}/v1"), state)
}

fn chat(base_url: String, model: &str) -> OpenAiChat {
    OpenAiChat::new(OpenAiChatOptions {
        base_url,
        api_key: "sk-test".to_string(),
        model: model.to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
    })
    .expect("chat")
}

#[tokio::test]
async fn sends_system_and_user_messages() {
    let (base, state) = spawn_mock().await;
    let chat = chat(base, "gpt-4o-mini");

    let reply = chat
        .complete(ChatRequest::new("be brief", "any mail?", 0.0))
        .await
        .expect("reply");

    assert_eq!(reply, "hello Alice");
    let requests = state.requests.lock().clone();
    let (auth, body) = &requests[0];
    assert_eq!(auth, "Bearer sk-test");
    assert_eq!(body["temperature"], json!(0.0));
    assert_eq!(
        body["messages"],
        json!([
            { "role": "system", "content": "be brief" },
            { "role": "user", "content": "any mail?" },
        ])
    );
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let (base, _state) = spawn_mock().await;
    let chat = chat(base, "broken");

    let err = chat
        .complete(ChatRequest::new("s", "u", 0.7))
        .await
        .unwrap_err();
    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 429);
            assert!(message.contains("rate limited"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_choices_is_reported() {
    let (base, _state) = spawn_mock().await;
    let chat = chat(base, "silent");

    let err = chat
        .complete(ChatRequest::new("s", "u", 0.7))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}
