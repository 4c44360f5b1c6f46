use super::*;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode as HttpStatus,
    Json, Router,
};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct MockState {
    status: HttpStatus,
    reply: serde_json::Value,
    tx: Arc<Mutex<Option<oneshot::Sender<(String, serde_json::Value)>>>>,
}

async fn handle_generate(
    State(state): State<MockState>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<serde_json::Value>,
) -> (HttpStatus, Json<serde_json::Value>) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send((uri.to_string(), body));
    }
    (state.status, Json(state.reply))
}

async fn spawn_gemini(
    status: HttpStatus,
    reply: serde_json::Value,
) -> (String, oneshot::Receiver<(String, serde_json::Value)>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = MockState {
        status,
        reply,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new().fallback(handle_generate).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/v1beta/models"), rx)
}

#[tokio::test]
async fn sends_prompt_and_returns_first_candidate_text() {
    let (base_url, request_rx) = spawn_gemini(
        HttpStatus::OK,
        serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "- slow labs" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }),
    )
    .await;

    let summarizer = GeminiSummarizer::new("test-key", "gemini-2.5-pro").with_base_url(base_url);
    let summary = summarizer.complete("prompt text").await.expect("summary");
    assert_eq!(summary, "- slow labs");

    let (uri, body) = request_rx.await.expect("request");
    assert_eq!(
        uri,
        "/v1beta/models/gemini-2.5-pro:generateContent?key=test-key"
    );
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt text");
}

#[tokio::test]
async fn api_error_body_is_surfaced() {
    let (base_url, _rx) = spawn_gemini(
        HttpStatus::BAD_REQUEST,
        serde_json::json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        }),
    )
    .await;

    let err = GeminiSummarizer::new("bad", "gemini-2.5-pro")
        .with_base_url(base_url)
        .complete("prompt")
        .await
        .expect_err("should fail");
    assert_eq!(
        err.to_string(),
        "Gemini API error (400): INVALID_ARGUMENT: API key not valid"
    );
}

#[tokio::test]
async fn response_without_text_is_an_error() {
    let (base_url, _rx) = spawn_gemini(HttpStatus::OK, serde_json::json!({ "candidates": [] })).await;

    let err = GeminiSummarizer::new("k", "m")
        .with_base_url(base_url)
        .complete("prompt")
        .await
        .expect_err("should fail");
    assert!(err.to_string().contains("no text"));
}
