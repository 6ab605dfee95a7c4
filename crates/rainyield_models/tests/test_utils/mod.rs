//! In-process vendor stub for client tests.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One request seen by the stub.
#[derive(Debug, Clone)]
pub struct Captured {
    pub headers: HeaderMap,
    pub body: Value,
}

/// Requests recorded by a running stub.
pub type Recorder = Arc<Mutex<Vec<Captured>>>;

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reply: Value,
    seen: Recorder,
}

async fn respond(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.seen.lock().unwrap().push(Captured { headers, body });
    (state.status, Json(state.reply))
}

/// Serve `reply` with `status` on `path` at an ephemeral local port.
///
/// Returns the base URL and the request recorder.
pub async fn spawn_stub(path: &str, status: StatusCode, reply: Value) -> (String, Recorder) {
    let seen = Recorder::default();
    let app = Router::new().route(path, post(respond)).with_state(StubState {
        status,
        reply,
        seen: seen.clone(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}
