// ABOUTME: Shared test utilities for the logging integration tests
// ABOUTME: Captures formatted log lines in memory and builds routers wired with the middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::panic
)]
//! Shared test utilities for `google_structured_logger`

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use google_structured_logger::config::LoggerSettings;
use google_structured_logger::context::{identity, AuthenticatedUser};
use google_structured_logger::formatters::FormatterKind;
use google_structured_logger::logging::LoggingConfig;
use google_structured_logger::middleware::{
    log_request_and_response, set_user_context_middleware, RequestLogger,
};
use http_body::{Body as HttpBody, Frame, SizeHint};
use serde_json::{json, Value};
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::task;
use tracing::dispatcher::DefaultGuard;
use tracing::{info, subscriber};
use tracing_subscriber::fmt::MakeWriter;

/// Header the test auth layer reads the user object from
pub const TEST_USER_HEADER: &str = "x-test-user";

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

/// Writer handed out per event by [`CapturedLogs`]
pub struct CapturedWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl CapturedLogs {
    /// Raw captured output
    pub fn text(&self) -> String {
        String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
    }

    /// Every captured line parsed as JSON
    pub fn entries(&self) -> Vec<Value> {
        self.text()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    /// Entries whose message starts with `prefix`
    pub fn entries_starting_with(&self, prefix: &str) -> Vec<Value> {
        self.entries()
            .into_iter()
            .filter(|entry| {
                entry["message"]
                    .as_str()
                    .is_some_and(|message| message.starts_with(prefix))
            })
            .collect()
    }

    /// Request and response records written by the logging middleware
    pub fn http_records(&self) -> Vec<Value> {
        self.entries()
            .into_iter()
            .filter(|entry| {
                entry.get("http_request").is_some() || entry.get("http_response").is_some()
            })
            .collect()
    }
}

/// Body that advertises an exact length and then fails with a connection reset
#[derive(Debug, Clone, Copy)]
pub struct ResetBody {
    /// Length reported by the size hint
    pub advertised: u64,
}

impl HttpBody for ResetBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(Some(Err(io::Error::from(io::ErrorKind::ConnectionReset))))
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.advertised)
    }
}

/// Install a thread-local subscriber writing `formatter` lines into a fresh capture
pub fn capture(formatter: FormatterKind, project: Option<&str>) -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let config = LoggingConfig {
        level: "info".into(),
        formatter,
        google_cloud_project: project.map(ToOwned::to_owned),
        ..LoggingConfig::default()
    };
    let guard = subscriber::set_default(config.subscriber_with_writer(logs.clone()));
    (logs, guard)
}

/// Standard JSON capture
pub fn capture_standard() -> (CapturedLogs, DefaultGuard) {
    capture(FormatterKind::Standard, None)
}

/// Test auth layer: trusts a JSON user object from [`TEST_USER_HEADER`]
pub async fn test_auth(mut request: Request<Body>, next: Next) -> Response {
    let user = request
        .headers()
        .get(TEST_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok());
    if let Some(user) = user {
        request.extensions_mut().insert(AuthenticatedUser::new(user));
    }
    next.run(request).await
}

async fn items() -> Json<Value> {
    Json(json!({"items": [1, 2, 3], "api_key": "abcdef123456"}))
}

async fn echo(body: String) -> Response {
    ([("content-type", "application/json")], body).into_response()
}

async fn whoami() -> Json<Value> {
    task::yield_now().await;
    let current = identity::current();
    let user_id = current.as_ref().and_then(|identity| identity.user_id.clone());
    info!(expected_user = %user_id.clone().unwrap_or(serde_json::Value::Null), "Handling whoami");
    task::yield_now().await;
    Json(json!({
        "uuid": current.map(|identity| identity.uuid),
        "user_id": user_id,
    }))
}

async fn broken_report() -> Response {
    (
        [("content-type", "application/json"), ("x-report", "partial")],
        Body::new(ResetBody { advertised: 32 }),
    )
        .into_response()
}

async fn missing() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

/// Application routes without any middleware
pub fn routes() -> Router {
    Router::new()
        .route("/items", get(items))
        .route("/echo", post(echo))
        .route("/whoami", get(whoami))
        .route("/missing", get(missing))
        .route("/report", get(broken_report))
        .route("/panic", get(explode))
        .route("/health/", get(|| async { "OK" }))
        .route("/__debug__/sql", get(|| async { "debug" }))
}

/// Routes wrapped in auth, identity and request logging middleware
pub fn logged_router(settings: &LoggerSettings) -> Router {
    let logger = Arc::new(RequestLogger::from_settings(settings).unwrap());
    routes()
        .layer(middleware::from_fn_with_state(logger, log_request_and_response))
        .layer(middleware::from_fn_with_state(
            Arc::new(settings.clone()),
            set_user_context_middleware,
        ))
        .layer(middleware::from_fn(test_auth))
}

/// GET request with optional test user
pub fn get_request(uri: &str, user: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header(TEST_USER_HEADER, user.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

/// JSON POST request
pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body to JSON
pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
