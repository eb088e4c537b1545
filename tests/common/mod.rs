//! Stub prediction backend shared by the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;

pub const WELL_FORMED: &str = r#"{
    "message": "Prediction complete",
    "hsc_predictions": [
        {"class": "LT-HSC", "probability": 0.62},
        {"class": "ST-HSC", "probability": 0.28},
        {"class": "MPP", "probability": 0.1}
    ],
    "lineage_predictions": [
        {"class": "Myeloid", "probability": 0.55},
        {"class": "Lymphoid", "probability": 0.3},
        {"class": "Erythroid", "probability": 0.15}
    ]
}"#;

/// One multipart field seen by the stub
#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct StubBackend {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    received: Arc<Mutex<Vec<ReceivedField>>>,
}

impl StubBackend {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
            received: Arc::default(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK, WELL_FORMED)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn received(&self) -> Vec<ReceivedField> {
        self.received.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port and return the base URL
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/predict", post(predict))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn predict(State(stub): State<StubBackend>, mut multipart: Multipart) -> (StatusCode, String) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        stub.received.lock().unwrap().push(ReceivedField {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }
    (stub.status, stub.body.clone())
}

/// Base URL of a port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Serve one request with a 500 whose body ends before its declared length
pub async fn truncated_error_url() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        // the multipart body ends with the closing boundary "--\r\n"
        while !request.windows(4).any(|w| w == b"--\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{addr}")
}
