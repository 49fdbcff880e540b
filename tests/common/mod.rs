//! In-process mock agent backend for integration tests
//!
//! Serves the four agent endpoints on an ephemeral port, records every
//! request body, and replies with configurable JSON or a forced HTTP status.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct MockBackend {
    /// (operation, request body) in arrival order
    pub requests: Arc<Mutex<Vec<(String, Value)>>>,
    pub research_reply: Arc<Mutex<Value>>,
    pub llm_reply: Arc<Mutex<Value>>,
    pub opaque_reply: Arc<Mutex<Value>>,
    /// When set, every endpoint replies with this status instead
    pub fail_with: Arc<Mutex<Option<u16>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            research_reply: Arc::new(Mutex::new(json!({"success": true, "data": {}}))),
            llm_reply: Arc::new(Mutex::new(
                json!({"success": true, "model": "gemini", "response": "ok"}),
            )),
            opaque_reply: Arc::new(Mutex::new(json!({"success": true, "data": {}}))),
            fail_with: Arc::new(Mutex::new(None)),
        }
    }
}

impl MockBackend {
    pub fn set_research_reply(&self, reply: Value) {
        *self.research_reply.lock().unwrap() = reply;
    }

    pub fn set_llm_reply(&self, reply: Value) {
        *self.llm_reply.lock().unwrap() = reply;
    }

    pub fn fail_with(&self, status: u16) {
        *self.fail_with.lock().unwrap() = Some(status);
    }

    pub fn recorded(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, operation: &str, body: Value, reply: Value) -> Response {
        self.requests
            .lock()
            .unwrap()
            .push((operation.to_string(), body));

        if let Some(status) = *self.fail_with.lock().unwrap() {
            let status = StatusCode::from_u16(status).expect("valid status");
            return (status, Json(json!({"detail": "forced failure"}))).into_response();
        }

        Json(reply).into_response()
    }
}

async fn research(State(state): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let reply = state.research_reply.lock().unwrap().clone();
    state.respond("research", body, reply)
}

async fn sentiment(State(state): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let reply = state.opaque_reply.lock().unwrap().clone();
    state.respond("sentiment", body, reply)
}

async fn portfolio(State(state): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let reply = state.opaque_reply.lock().unwrap().clone();
    state.respond("portfolio", body, reply)
}

async fn llm(State(state): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let reply = state.llm_reply.lock().unwrap().clone();
    state.respond("llm", body, reply)
}

/// Start the mock backend; returns the base URL to inject into the client
pub async fn spawn(state: MockBackend) -> String {
    let app = Router::new()
        .route("/api/agents/research", post(research))
        .route("/api/agents/sentiment", post(sentiment))
        .route("/api/agents/portfolio", post(portfolio))
        .route("/api/agents/llm", post(llm))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api/agents", addr)
}
