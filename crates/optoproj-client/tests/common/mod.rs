//! In-process fake of the Optoma cloud for client tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::{get, post};
use axum::Router;
use optoproj_client::{ClientConfig, Credentials, ProjectorClient};
use serde_json::{json, Value};

/// One request as seen by the fake cloud.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Canned answers for each endpoint.
#[derive(Debug, Clone)]
pub struct Responses {
    pub login: (StatusCode, String),
    pub devices: (StatusCode, String),
    pub run_task: (StatusCode, String),
    pub login_delay: Option<Duration>,
    pub devices_delay: Option<Duration>,
    pub run_task_delay: Option<Duration>,
}

impl Default for Responses {
    fn default() -> Self {
        Self {
            login: (
                StatusCode::OK,
                json!({"result_code": 200, "result": {"token": "test-token"}}).to_string(),
            ),
            devices: (
                StatusCode::OK,
                json!({"result_code": 200, "result": [{"id": "12345", "device_model": "UHZ99"}]})
                    .to_string(),
            ),
            run_task: (StatusCode::OK, json!({"result_code": 200}).to_string()),
            login_delay: None,
            devices_delay: None,
            run_task_delay: None,
        }
    }
}

struct FakeState {
    responses: Responses,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Running fake cloud bound to an ephemeral port.
pub struct FakeCloud {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeCloud {
    pub async fn start() -> Self {
        Self::with_responses(Responses::default()).await
    }

    pub async fn with_responses(responses: Responses) -> Self {
        let state = Arc::new(FakeState {
            responses,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/member/login", post(login))
            .route("/device", get(devices))
            .route("/device/run_task", post(run_task))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake cloud");
        let addr = listener.local_addr().expect("fake cloud address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self, username: &str, password: &str) -> ProjectorClient {
        ProjectorClient::with_config(
            reqwest::Client::new(),
            ClientConfig::default()
                .with_base_url(self.base_url())
                .with_timeout_secs(1),
            Credentials::new(username, password),
        )
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// Address nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn record(state: &FakeState, method: Method, uri: &Uri, headers: &HeaderMap, body: &str) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = serde_json::from_str(body).unwrap_or(Value::Null);

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        authorization,
        body,
    });
}

async fn stall(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

async fn login(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    record(&state, method, &uri, &headers, &body);
    stall(state.responses.login_delay).await;
    state.responses.login.clone()
}

async fn devices(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    record(&state, method, &uri, &headers, &body);
    stall(state.responses.devices_delay).await;
    state.responses.devices.clone()
}

async fn run_task(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    record(&state, method, &uri, &headers, &body);
    stall(state.responses.run_task_delay).await;
    state.responses.run_task.clone()
}
