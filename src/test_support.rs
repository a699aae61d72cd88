//! In-process stand-ins for the payment gateway and for this server.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

const TRANSACTIONS_PATH: &str = "/snap/v1/transactions";

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct StubReply {
    status: u16,
    body: String,
    delay: Duration,
}

impl StubReply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct StubGateway {
    addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubGateway {
    pub fn endpoint(&self) -> Url {
        Url::parse(&format!("http://{}{}", self.addr, TRANSACTIONS_PATH)).unwrap()
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

pub async fn spawn_gateway(reply: StubReply) -> StubGateway {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route(TRANSACTIONS_PATH, post(create_transaction))
        .with_state(StubState {
            reply,
            captured: Arc::clone(&captured),
        });

    StubGateway {
        addr: serve(app).await,
        captured,
    }
}

async fn create_transaction(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    state.captured.lock().unwrap().push(CapturedRequest {
        authorization: header("authorization"),
        content_type: header("content-type"),
        accept: header("accept"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    (
        StatusCode::from_u16(state.reply.status).unwrap(),
        state.reply.body.clone(),
    )
}

/// Binds `app` to an ephemeral local port and serves it in the background.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An endpoint on a port nothing listens on.
pub async fn closed_endpoint() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}{}", addr, TRANSACTIONS_PATH)).unwrap()
}
