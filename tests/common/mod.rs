#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use reqwest::Client;
use serde_json::{Value, json};

use topsync::{
    config::TokenGrant,
    spotify::{Gateway, SpotifyApi},
};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// In-memory stand-in for the data API and the queue endpoint.
pub struct MockApi {
    pub token_response: Mutex<(u16, Value)>,
    /// Response overrides keyed by (endpoint segment, time range).
    pub overrides: Mutex<HashMap<(String, String), (u16, Value)>>,
    /// Artificial latency per time range, in milliseconds.
    pub delays: Mutex<HashMap<String, u64>>,
    pub token_requests: Mutex<Vec<RecordedRequest>>,
    pub item_requests: Mutex<Vec<RecordedRequest>>,
    pub queue_bodies: Mutex<Vec<String>>,
}

impl Default for MockApi {
    fn default() -> Self {
        MockApi {
            token_response: Mutex::new((
                200,
                json!({"access_token": "abc", "refresh_token": "def"}),
            )),
            overrides: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            token_requests: Mutex::new(Vec::new()),
            item_requests: Mutex::new(Vec::new()),
            queue_bodies: Mutex::new(Vec::new()),
        }
    }
}

impl MockApi {
    pub fn set_token_response(&self, status: u16, body: Value) {
        *self.token_response.lock().unwrap() = (status, body);
    }

    pub fn set_override(&self, segment: &str, time_range: &str, status: u16, body: Value) {
        self.overrides
            .lock()
            .unwrap()
            .insert((segment.to_string(), time_range.to_string()), (status, body));
    }

    pub fn set_delay(&self, time_range: &str, millis: u64) {
        self.delays
            .lock()
            .unwrap()
            .insert(time_range.to_string(), millis);
    }

    pub fn token_calls(&self) -> usize {
        self.token_requests.lock().unwrap().len()
    }

    pub fn item_calls(&self) -> usize {
        self.item_requests.lock().unwrap().len()
    }

    pub fn item_requests(&self) -> Vec<RecordedRequest> {
        self.item_requests.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> Vec<RecordedRequest> {
        self.token_requests.lock().unwrap().clone()
    }

    pub fn queue_bodies(&self) -> Vec<String> {
        self.queue_bodies.lock().unwrap().clone()
    }
}

/// Two entries per item type, as the data API would return them.
pub fn default_items(segment: &str) -> Value {
    match segment {
        "artists" | "tracks" => json!({"items": [{"id": "1"}, {"id": "2"}]}),
        "genres" => json!({"items": [
            {"name": "genre1", "count": 3},
            {"name": "genre2", "count": 1}
        ]}),
        "emotions" => json!({"items": [
            {"name": "emotion1", "percentage": 0.3},
            {"name": "emotion2", "percentage": 0.1}
        ]}),
        _ => json!({"error": "unknown segment"}),
    }
}

fn header(headers: &HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

async fn token(
    State(state): State<Arc<MockApi>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    state.token_requests.lock().unwrap().push(RecordedRequest {
        path: "/auth/tokens/refresh".to_string(),
        query: HashMap::new(),
        authorization: header(&headers, AUTHORIZATION),
        content_type: header(&headers, "content-type"),
        body,
    });

    let (code, body) = state.token_response.lock().unwrap().clone();
    (status(code), Json(body))
}

async fn top_items(
    State(state): State<Arc<MockApi>>,
    Path(segment): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let time_range = query.get("time_range").cloned().unwrap_or_default();
    state.item_requests.lock().unwrap().push(RecordedRequest {
        path: format!("/me/top/{segment}"),
        query: query.clone(),
        authorization: header(&headers, AUTHORIZATION),
        content_type: None,
        body: String::new(),
    });

    let delay = state.delays.lock().unwrap().get(&time_range).copied();
    if let Some(millis) = delay {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    let overridden = state
        .overrides
        .lock()
        .unwrap()
        .get(&(segment.clone(), time_range))
        .cloned();
    match overridden {
        Some((code, body)) => (status(code), Json(body)),
        None => (StatusCode::OK, Json(default_items(&segment))),
    }
}

async fn queue(State(state): State<Arc<MockApi>>, body: String) -> StatusCode {
    state.queue_bodies.lock().unwrap().push(body);
    StatusCode::OK
}

async fn fixed_status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    (status(code), Json(json!({"status": code})))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({"ok": true}))
}

async fn not_json() -> &'static str {
    "<html>definitely not json</html>"
}

/// Starts the mock on an ephemeral port and returns its base URL.
pub async fn spawn(state: Arc<MockApi>) -> String {
    let app = Router::new()
        .route("/auth/tokens/refresh", post(token))
        .route("/me/top/{segment}", get(top_items))
        .route("/queue", post(queue))
        .route("/status/{code}", get(fixed_status))
        .route("/slow", get(slow))
        .route("/not-json", get(not_json))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

pub fn gateway() -> Gateway {
    Gateway::new(Client::new(), Duration::from_secs(5))
}

pub fn api(base_url: &str) -> SpotifyApi {
    SpotifyApi::new(
        gateway(),
        base_url,
        format!("{base_url}/auth/tokens/refresh"),
        TokenGrant::Json,
    )
}

/// An address nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
