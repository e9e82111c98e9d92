//! In-process stub of the webTRDP backend REST API

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Notify;
use webtrdp_common::ClientConfig;
use webtrdpctl::{OperationKind, Workbench};

/// Canned (status, body) for one endpoint
#[derive(Clone)]
pub struct Canned {
    pub status: u16,
    pub body: String,
}

impl Canned {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub struct StubBackend {
    pub telegrams: Mutex<Canned>,
    pub configs: Mutex<Canned>,
    /// None echoes the request like the real backend
    pub load_reply: Mutex<Option<Canned>>,
    pub load_requests: Mutex<Vec<Value>>,
    pub telegram_hits: Mutex<usize>,
    /// When set, config loads wait for a notification before answering
    pub hold_loads: Mutex<bool>,
    pub load_gate: Notify,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self {
            telegrams: Mutex::new(Canned::ok(json!([]))),
            configs: Mutex::new(Canned::ok(json!({}))),
            load_reply: Mutex::new(None),
            load_requests: Mutex::new(Vec::new()),
            telegram_hits: Mutex::new(0),
            hold_loads: Mutex::new(false),
            load_gate: Notify::new(),
        }
    }
}

fn reply(canned: Canned) -> (StatusCode, String) {
    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, canned.body)
}

async fn telegrams(State(stub): State<Arc<StubBackend>>) -> (StatusCode, String) {
    *stub.telegram_hits.lock().unwrap() += 1;
    let canned = stub.telegrams.lock().unwrap().clone();
    reply(canned)
}

async fn configs(State(stub): State<Arc<StubBackend>>) -> (StatusCode, String) {
    let canned = stub.configs.lock().unwrap().clone();
    reply(canned)
}

async fn load(
    State(stub): State<Arc<StubBackend>>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    stub.load_requests.lock().unwrap().push(body.clone());
    let hold = *stub.hold_loads.lock().unwrap();
    if hold {
        stub.load_gate.notified().await;
    }

    let canned = stub.load_reply.lock().unwrap().clone();
    match canned {
        Some(canned) => reply(canned),
        None => reply(Canned::ok(json!({
            "status": "config loaded",
            "path": body["path"],
            "host_name": body["host_name"],
        }))),
    }
}

async fn enable(Path(com_id): Path<u32>, Json(body): Json<Value>) -> (StatusCode, String) {
    if com_id == 0 {
        return reply(Canned::raw(400, r#"{"error":"Unknown COM ID"}"#));
    }
    reply(Canned::ok(json!({
        "status": "pd enable updated",
        "com_id": com_id,
        "enabled": body["enable"],
    })))
}

async fn values(Path(com_id): Path<u32>, Json(body): Json<Value>) -> (StatusCode, String) {
    let count = body["fields"].as_array().map(|f| f.len()).unwrap_or(0);
    reply(Canned::ok(json!({
        "status": "pd values updated",
        "com_id": com_id,
        "updated_fields": count,
    })))
}

/// Start the stub on an ephemeral port, returning its base URL
pub async fn start(stub: Arc<StubBackend>) -> String {
    let app = Router::new()
        .route("/api/pd/telegrams", get(telegrams))
        .route("/api/configs", get(configs))
        .route("/api/configs/load", post(load))
        .route("/api/pd/:com_id/enable", post(enable))
        .route("/api/pd/:com_id/values", patch(values))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL where nothing is listening
pub fn dead_backend_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Backend that answers every request with `status` and a body cut short:
/// Content-Length promises more bytes than are sent before the close.
pub async fn truncated_backend(status: u16) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let reply = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: text/plain\r\nContent-Length: 100\r\nConnection: close\r\n\r\nengine",
                    status
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}", addr)
}

/// Consume one request (headers plus Content-Length body)
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let body_len = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return;
            }
        }
    }
}

pub fn workbench(base_url: &str) -> Workbench {
    let mut config = ClientConfig::default();
    config.backend.url = base_url.to_string();
    Workbench::from_config(&config).unwrap()
}

/// Wait until `kind` shows as busy (operation issued and in flight)
pub async fn wait_until_busy(workbench: &Workbench, kind: OperationKind) {
    for _ in 0..200 {
        if workbench.state().is_busy(kind) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("{:?} never became busy", kind);
}

pub fn telegram(com_id: u32, name: &str) -> Value {
    json!({
        "name": name,
        "com_id": com_id,
        "dataset_id": com_id + 1000,
        "direction": "source",
        "cycle_us": 100000,
        "interface": "eth0",
        "tx_enabled": true,
        "next_tx_due_us": 5000,
        "tx_payload_size": 8,
        "last_rx_payload_size": 0,
        "last_rx_time_us": 0,
        "last_rx_valid": false,
        "rx_count": 0,
        "tx_count": 4,
        "timeout_count": 0,
        "last_period_us": 0.0,
        "avg_period_us": 0.0
    })
}
