//! In-process stand-in for the rover controller, used by async tests.
//!
//! Serves the REST collaborators and the `/ws/frontend` stream from one
//! axum router bound to an ephemeral port. Each stream connection replays
//! the configured script, then records inbound text until the client leaves
//! (or closes straight away when `close_after_script` is set).

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tokio::task::JoinHandle;
use wire::LogEntry;

#[derive(Debug)]
pub struct Script {
    pub logs: Vec<LogEntry>,
    pub connected: bool,
    pub history: Vec<String>,
    pub reset_status: StatusCode,
    /// Hold each reset request this long before answering.
    pub reset_delay: Option<Duration>,
    /// Text frames pushed to every new stream connection.
    pub pushes: Vec<String>,
    pub close_after_script: bool,
    /// Recorded inbound text frames.
    pub received: Vec<String>,
    pub stream_connections: usize,
    pub reset_calls: usize,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            logs: Vec::new(),
            connected: false,
            history: Vec::new(),
            reset_status: StatusCode::OK,
            reset_delay: None,
            pushes: Vec::new(),
            close_after_script: false,
            received: Vec::new(),
            stream_connections: 0,
            reset_calls: 0,
        }
    }
}

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Script>>);

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Script> {
        self.0.lock().expect("fake controller mutex")
    }
}

pub struct FakeController {
    pub addr: SocketAddr,
    shared: Shared,
    task: JoinHandle<()>,
}

impl FakeController {
    pub async fn start(script: Script) -> Self {
        let shared = Shared(Arc::new(Mutex::new(script)));
        let app = Router::new()
            .route("/logs", get(get_logs).post(post_logs))
            .route("/connection_status", get(get_status))
            .route("/mazehistory/id", get(get_history))
            .route("/ws/frontend", get(ws_upgrade))
            .with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake controller serve");
        });
        Self { addr, shared, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws/frontend", self.addr)
    }

    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.shared.lock()
    }

    /// Poll until `done` holds for the script, or fail after two seconds.
    pub async fn wait_for(&self, what: &str, done: impl Fn(&Script) -> bool) {
        for _ in 0..200 {
            if done(&*self.shared.lock()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {what}");
    }
}

impl Drop for FakeController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Accepts TCP connections and holds them open without ever answering,
/// so HTTP requests and websocket handshakes against it hang.
pub struct SilentHost {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl SilentHost {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _peer)) = listener.accept().await {
                held.push(socket);
            }
        });
        Self { addr, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws/frontend", self.addr)
    }
}

impl Drop for SilentHost {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn get_logs(State(shared): State<Shared>) -> Response {
    let logs = shared.lock().logs.clone();
    axum::Json(json!({ "logs": logs })).into_response()
}

async fn post_logs(State(shared): State<Shared>) -> StatusCode {
    let delay = {
        let mut script = shared.lock();
        script.reset_calls += 1;
        script.reset_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let mut script = shared.lock();
    if script.reset_status.is_success() {
        script.logs.clear();
    }
    script.reset_status
}

async fn get_status(State(shared): State<Shared>) -> Response {
    let connected = shared.lock().connected;
    axum::Json(json!({ "connected": connected })).into_response()
}

async fn get_history(State(shared): State<Shared>) -> Response {
    let history = shared.lock().history.clone();
    axum::Json(history).into_response()
}

async fn ws_upgrade(State(shared): State<Shared>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_stream(socket, shared))
}

async fn run_stream(mut socket: WebSocket, shared: Shared) {
    let (pushes, close) = {
        let mut script = shared.lock();
        script.stream_connections += 1;
        (script.pushes.clone(), script.close_after_script)
    };
    for text in pushes {
        if socket.send(Message::Text(text.into())).await.is_err() {
            return;
        }
    }
    if close {
        socket.send(Message::Close(None)).await.ok();
        return;
    }
    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(text) => {
                shared.lock().received.push(text.as_str().to_owned());
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}
