//! In-process stand-in for the extraction service, used by tests.

use crate::upload::{EXTRACT_PATH, HEALTH_PATH};
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::Response;
use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct CapturedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    status: u16,
    body: Arc<str>,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    parts: Arc<Mutex<Vec<CapturedPart>>>,
}

pub(crate) struct MockService {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    parts: Arc<Mutex<Vec<CapturedPart>>>,
}

impl MockService {
    pub fn start(status: u16, body: &str) -> Self {
        Self::start_with_delay(status, body, Duration::ZERO)
    }

    /// Serves on its own thread and runtime so callers need no Tokio context.
    pub fn start_with_delay(status: u16, body: &str, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let parts = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body: Arc::from(body),
            delay,
            hits: hits.clone(),
            parts: parts.clone(),
        };

        let app = Router::new()
            .route(EXTRACT_PATH, post(extract))
            .route(HEALTH_PATH, get(health))
            .with_state(state);

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        Self {
            base_url,
            hits,
            parts,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn parts(&self) -> Vec<CapturedPart> {
        self.parts.lock().unwrap().clone()
    }
}

async fn extract(State(state): State<MockState>, mut multipart: Multipart) -> Response<Body> {
    state.hits.fetch_add(1, Ordering::SeqCst);

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.parts.lock().unwrap().push(CapturedPart {
            field: name,
            file_name,
            content_type,
            bytes,
        });
    }

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    Response::builder()
        .status(state.status)
        .header("Content-Type", "application/json")
        .body(Body::from(state.body.to_string()))
        .unwrap()
}

async fn health(State(state): State<MockState>) -> Response<Body> {
    let ok = (200..300).contains(&state.status);
    Response::builder()
        .status(state.status)
        .header("Content-Type", "application/json")
        .body(Body::from(format!(r#"{{"ok": {}}}"#, ok)))
        .unwrap()
}
