use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Save requests received by the test server, as (endpoint, body)
pub type SavedRequests = Arc<Mutex<Vec<(String, Value)>>>;

#[derive(Clone, Default)]
struct ServerState {
    preview_hits: Arc<AtomicUsize>,
    saved: SavedRequests,
    reject_saves: Arc<AtomicBool>,
}

/// Serves preview payloads and records data input save requests
pub struct TestServer {
    pub base_url: String,
    state: ServerState,
}

impl TestServer {
    pub async fn new() -> Self {
        let state = ServerState::default();

        let app = Router::new()
            .route("/preview/object", get(|State(s): State<ServerState>| async move {
                s.preview_hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({"a": 1, "b": 2}))
            }))
            .route("/preview/fields", get(|State(s): State<ServerState>| async move {
                s.preview_hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({"x": 1, "y": 2}))
            }))
            .route("/preview/nested", get(|State(s): State<ServerState>| async move {
                s.preview_hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({
                    "meta": {"page": 1},
                    "results": [
                        {"id": 1, "token": "t1"},
                        {"id": 2, "token": "t2"}
                    ]
                }))
            }))
            .route("/preview/slow", get(|State(s): State<ServerState>| async move {
                s.preview_hits.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(tokio::time::Duration::from_millis(300)).await;
                Json(json!({"slow": true}))
            }))
            .route("/preview/missing", get(|State(s): State<ServerState>| async move {
                s.preview_hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::NOT_FOUND, "not found")
            }))
            .route("/preview/not-json", get(|State(s): State<ServerState>| async move {
                s.preview_hits.fetch_add(1, Ordering::SeqCst);
                "definitely not json"
            }))
            .route("/api/data-inputs/index", post(|State(s): State<ServerState>, Json(body): Json<Value>| async move {
                record_save(&s, "index", body)
            }))
            .route("/api/data-inputs/kvstore", post(|State(s): State<ServerState>, Json(body): Json<Value>| async move {
                record_save(&s, "kvstore", body)
            }))
            .with_state(state.clone());

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer { base_url, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn preview_hits(&self) -> usize {
        self.state.preview_hits.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Vec<(String, Value)> {
        self.state.saved.lock().unwrap().clone()
    }

    pub fn reject_saves(&self) {
        self.state.reject_saves.store(true, Ordering::SeqCst);
    }
}

fn record_save(state: &ServerState, endpoint: &str, body: Value) -> StatusCode {
    if state.reject_saves.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.saved.lock().unwrap().push((endpoint.to_string(), body));
    StatusCode::CREATED
}
