//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use chatrelay_api::{AppState, build_app};
use chatrelay_core::config::AppConfig;
use chatrelay_core::result::AppResult;

/// How long a client waits for the next frame before failing the test.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration used by every test server.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.public_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("public")
        .to_string_lossy()
        .into_owned();
    config.server.shutdown_grace_seconds = 1;
    config
}

/// Router-only application for request/response tests
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with a fresh engine
    pub fn new() -> Self {
        Self::from_state(AppState::new(test_config()))
    }

    /// Wrap existing state, e.g. a running server's
    pub fn from_state(state: AppState) -> Self {
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            body,
            text,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header, if any
    pub content_type: Option<String>,
    /// Parsed JSON body (`Null` when not JSON)
    pub body: Value,
    /// Raw body text
    pub text: String,
}

/// A server listening on an ephemeral local port
pub struct TestServer {
    /// Bound address
    pub addr: SocketAddr,
    /// State shared with the running server
    pub state: AppState,
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<AppResult<()>>,
}

impl TestServer {
    /// Start a server with the default test configuration
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Start a server with a custom configuration
    pub async fn spawn_with(config: AppConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");

        let state = AppState::new(config);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(chatrelay_api::serve(listener, state.clone(), async move {
            let _ = stop_rx.await;
        }));

        Self {
            addr,
            state,
            stop_tx: Some(stop_tx),
            task,
        }
    }

    /// WebSocket endpoint URL
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Open a new WebSocket client
    pub async fn connect(&self) -> WsClient {
        let (stream, _) = connect_async(self.ws_url())
            .await
            .expect("WebSocket handshake failed");
        WsClient { stream, next_ack: 0 }
    }

    /// Trigger graceful shutdown and wait for the server task
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        let result = tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("Server did not stop in time")
            .expect("Server task panicked");
        assert!(result.is_ok(), "Server returned an error: {result:?}");
    }
}

/// Minimal client speaking the relay's JSON frame protocol
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    next_ack: u64,
}

impl WsClient {
    /// Send an event with a fresh ack id, returning the id
    pub async fn emit(&mut self, event: &str, data: Value) -> u64 {
        self.next_ack += 1;
        let id = self.next_ack;
        self.send_raw(json!({"event": event, "data": data, "ack": id}).to_string())
            .await;
        id
    }

    /// Send a raw text frame
    pub async fn send_raw(&mut self, text: impl Into<String>) {
        self.stream
            .send(Message::text(text.into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next JSON frame, skipping control frames
    pub async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Connection ended")
                .expect("WebSocket error");
            match msg {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                other => panic!("Unexpected frame: {other:?}"),
            }
        }
    }

    /// Next frame, which must be `event`; returns its data
    pub async fn recv_event(&mut self, event: &str) -> Value {
        let frame = self.recv().await;
        assert_eq!(frame["event"], event, "unexpected frame {frame}");
        frame["data"].clone()
    }

    /// Collect frames up to the ack for `id`; returns them and the ack error
    pub async fn until_ack(&mut self, id: u64) -> (Vec<Value>, Option<String>) {
        let mut frames = Vec::new();
        loop {
            let frame = self.recv().await;
            if frame["event"] == "ack" && frame["data"]["id"] == id {
                let error = frame["data"]
                    .get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                return (frames, error);
            }
            frames.push(frame);
        }
    }

    /// `join` and wait for its ack
    pub async fn join(&mut self, username: &str, room: &str) -> (Vec<Value>, Option<String>) {
        let id = self
            .emit("join", json!({"username": username, "room": room}))
            .await;
        self.until_ack(id).await
    }

    /// `sendMessage` and wait for its ack
    pub async fn say(&mut self, text: &str) -> (Vec<Value>, Option<String>) {
        let id = self.emit("sendMessage", json!(text)).await;
        self.until_ack(id).await
    }

    /// Assert nothing but control frames arrive within `wait`
    pub async fn assert_silent(&mut self, wait: Duration) {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Err(_) => return,
                Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
                Ok(other) => panic!("Expected silence, got {other:?}"),
            }
        }
    }

    /// Assert the server closes the connection
    pub async fn expect_closed(&mut self) {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for close");
            match next {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(other)) => panic!("Expected close, got {other:?}"),
            }
        }
    }

    /// Close the connection from the client side
    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
