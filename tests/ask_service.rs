// tests/ask_service.rs
//
// Drives the client and controller against an in-process mock of the ask
// service.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use ask_chat::chat::{CONNECTION_ERROR_BANNER, FALLBACK_ERROR_TEXT, STOPPED_TEXT};
use ask_chat::{AskClient, AskError, Asker, ChatController, Role};

/// Serve `router` on an ephemeral port and return its base URL
async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Service that echoes the question back with one source
fn echo_service(calls: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/ask",
        post(move |Json(body): Json<Value>| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Json(json!({
                    "answer": format!("**Echo:** {}", body["question"].as_str().unwrap_or("")),
                    "sources": [
                        {"source": "fees_2025.pdf", "score": 0.873},
                        {"source": "hostel_rules.pdf", "score": 0.611}
                    ],
                    "response_time": 0.42
                }))
            }
        }),
    )
}

fn failing_service() -> Router {
    Router::new().route(
        "/ask",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "detail": "An error occurred while processing your question. Please try again."
                })),
            )
        }),
    )
}

fn slow_service() -> Router {
    Router::new().route(
        "/ask",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(json!({"answer": "too late", "sources": []}))
        }),
    )
}

#[tokio::test]
async fn test_client_posts_question_and_parses_answer() {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_service(echo_service(Arc::clone(&calls))).await;
    let client = AskClient::new(&base).unwrap();

    let response = client.ask("What are the hostel fees?").await.unwrap();
    assert_eq!(response.answer, "**Echo:** What are the hostel fees?");
    assert_eq!(response.sources.len(), 2);
    assert_eq!(response.sources[0].source, "fees_2025.pdf");
    assert_eq!(response.response_time, Some(0.42));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_top_k_is_forwarded_only_when_set() {
    let router = Router::new().route(
        "/ask",
        post(|Json(body): Json<Value>| async move {
            Json(json!({"answer": body.get("top_k").map(Value::to_string).unwrap_or_default()}))
        }),
    );
    let base = spawn_service(router).await;

    let client = AskClient::new(&base).unwrap();
    assert_eq!(client.ask("q").await.unwrap().answer, "");

    let client = client.with_top_k(Some(3));
    assert_eq!(client.ask("q").await.unwrap().answer, "3");
}

#[tokio::test]
async fn test_submit_appends_user_and_answered_bot() {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_service(echo_service(Arc::clone(&calls))).await;
    let mut controller = ChatController::new(AskClient::new(&base).unwrap());
    let cancel = CancellationToken::new();

    let bot = controller.send("  library hours?  ", &cancel).await.unwrap();
    assert_eq!(bot.text, "**Echo:** library hours?");
    assert!(!bot.is_streaming);
    assert!(!bot.is_error);
    assert_eq!(bot.sources.as_ref().map(Vec::len), Some(2));

    let messages = controller.state().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "library hours?");
    assert_eq!(messages[1].role, Role::Bot);
    assert!(!controller.state().is_in_flight());
    assert!(controller.state().error().is_none());
}

#[tokio::test]
async fn test_blank_input_sends_nothing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_service(echo_service(Arc::clone(&calls))).await;
    let mut controller = ChatController::new(AskClient::new(&base).unwrap());
    let cancel = CancellationToken::new();

    assert!(controller.send("", &cancel).await.is_none());
    assert!(controller.send(" \n\t", &cancel).await.is_none());
    assert!(controller.state().messages().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_server_error_shows_fallback_and_banner() {
    let base = spawn_service(failing_service()).await;
    let client = AskClient::new(&base).unwrap();

    match client.ask("anything").await {
        Err(AskError::Status { status, detail }) => {
            assert_eq!(status, 500);
            assert!(detail.starts_with("An error occurred"));
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let mut controller = ChatController::new(client);
    let bot = controller
        .send("anything", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(bot.text, FALLBACK_ERROR_TEXT);
    assert!(bot.is_error);
    assert_eq!(controller.state().error(), Some(CONNECTION_ERROR_BANNER));
    assert!(!controller.state().is_in_flight());
}

#[tokio::test]
async fn test_unreachable_service_shows_fallback() {
    // Grab a free port, then close it so connections are refused
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AskClient::new(&format!("http://{}", addr)).unwrap();
    assert!(matches!(client.ask("hello").await, Err(AskError::Network(_))));

    let mut controller = ChatController::new(client);
    let bot = controller
        .send("hello", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(bot.text, FALLBACK_ERROR_TEXT);
    assert_eq!(controller.state().error(), Some(CONNECTION_ERROR_BANNER));
}

#[tokio::test]
async fn test_cancel_before_response_marks_stopped() {
    let base = spawn_service(slow_service()).await;
    let mut controller = ChatController::new(AskClient::new(&base).unwrap());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let bot = controller.send("slow one", &cancel).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(bot.text, STOPPED_TEXT);
    assert!(bot.is_stopped);
    assert!(!bot.is_error);
    assert!(!bot.is_streaming);
    assert!(!controller.state().is_in_flight());
    assert!(controller.state().error().is_none());
}

#[tokio::test]
async fn test_timeout_is_a_failure_not_a_cancel() {
    let base = spawn_service(slow_service()).await;
    let client = AskClient::new(&base)
        .unwrap()
        .with_timeout(Duration::from_millis(100))
        .unwrap();

    let err = client.ask("slow one").await.unwrap_err();
    assert!(!err.is_cancelled());

    let mut controller = ChatController::new(client);
    let bot = controller
        .send("slow one", &CancellationToken::new())
        .await
        .unwrap();
    assert!(bot.is_error);
    assert_eq!(controller.state().error(), Some(CONNECTION_ERROR_BANNER));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let base = spawn_service(Router::new().route("/ask", post(|| async { "definitely not json" }))).await;
    let client = AskClient::new(&base).unwrap();

    match client.ask("hello").await {
        Err(AskError::Decode(msg)) => assert!(msg.contains("definitely not json")),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = Router::new().route(
        "/health",
        get(|| async { Json(json!({"status": "healthy", "version": "2.1"})) }),
    );
    let base = spawn_service(router).await;
    let client = AskClient::new(&base).unwrap();

    let health = client.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.version.as_deref(), Some("2.1"));
}

#[tokio::test]
async fn test_endpoint_with_path_prefix() {
    let calls = Arc::new(AtomicUsize::new(0));
    let router = Router::new().nest("/api", echo_service(Arc::clone(&calls)));
    let base = spawn_service(router).await;
    let client = AskClient::new(&format!("{}/api", base)).unwrap();

    let response = client.ask("prefix?").await.unwrap();
    assert_eq!(response.answer, "**Echo:** prefix?");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
