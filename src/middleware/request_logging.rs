// ABOUTME: Request/response logging middleware emitting one record before and one after each request
// ABOUTME: Captures method, path, query, headers, body, status, and duration with sensitive data masked
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::body::{self, CapturedBody};
use super::filtering::{EndpointFilter, HeaderFilter};
use crate::config::logging::LoggerSettings;
use crate::sanitize::Sanitizer;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use futures_util::FutureExt;
use http::{HeaderMap, Method, StatusCode, Uri};
use serde_json::{json, Value};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use structured_logger_core::constants::targets;
use structured_logger_core::errors::AppResult;
use tracing::{error, info, warn};

/// Compiled request logging policy, built once at startup
#[derive(Debug, Clone)]
pub struct RequestLogger {
    enabled: bool,
    endpoints: EndpointFilter,
    headers: HeaderFilter,
    sanitizer: Sanitizer,
    max_body_bytes: usize,
}

impl RequestLogger {
    /// Compile the logger described by `settings`
    ///
    /// # Errors
    ///
    /// Returns an error if a sensitive-key pattern does not compile
    pub fn from_settings(settings: &LoggerSettings) -> AppResult<Self> {
        Ok(Self {
            enabled: settings.middleware_enabled,
            endpoints: EndpointFilter::new(&settings.excluded_endpoints),
            headers: HeaderFilter::new(&settings.excluded_headers),
            sanitizer: Sanitizer::from_settings(settings)?,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    /// Whether requests to `path` produce records
    #[must_use]
    pub fn should_log(&self, path: &str) -> bool {
        self.enabled && !self.endpoints.is_ignored(path)
    }

    /// Structured request record
    #[must_use]
    pub fn request_record(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        captured: &CapturedBody,
    ) -> Value {
        let content_type = body::content_type_essence(headers);
        let query_params = body::query_params(uri)
            .map_or(Value::Null, |params| self.sanitizer.sanitize(&Value::Object(params)));

        json!({
            "method": method.as_str(),
            "path": uri.path(),
            "query_params": query_params,
            "content_type": content_type,
            "headers": self.filtered_headers(headers),
            "body": captured.render(content_type.as_deref(), &self.sanitizer),
        })
    }

    /// Structured response record
    #[must_use]
    pub fn response_record(
        &self,
        status: StatusCode,
        headers: &HeaderMap,
        captured: &CapturedBody,
        elapsed: Duration,
    ) -> Value {
        let content_type = body::content_type_essence(headers);
        json!({
            "status_code": status.as_u16(),
            "headers": self.filtered_headers(headers),
            "data": captured.render(content_type.as_deref(), &self.sanitizer),
            "duration_ms": duration_ms(elapsed),
        })
    }

    fn filtered_headers(&self, headers: &HeaderMap) -> Value {
        self.headers
            .filter(headers)
            .map_or(Value::Null, |kept| self.sanitizer.sanitize(&Value::Object(kept)))
    }
}

fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_owned())
}

/// Request/response logging middleware
///
/// Logs `Request {method} {path}` at INFO before the inner service runs and
/// `Response {method} {path} > {status}` after it completes, at INFO for 2xx
/// and WARN otherwise. Disabled loggers and excluded endpoints pass requests
/// through without any record. A panicking handler is logged at ERROR with
/// status 500 before the panic continues. Logging never changes the request
/// or the response the client receives.
///
/// # Example
///
/// ```rust,no_run
/// use axum::{middleware, routing::get, Router};
/// use google_structured_logger::config::logging::LoggerSettings;
/// use google_structured_logger::middleware::{log_request_and_response, RequestLogger};
/// use std::sync::Arc;
///
/// # async fn handler() -> &'static str { "" }
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let logger = Arc::new(RequestLogger::from_settings(&LoggerSettings::from_env())?);
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(middleware::from_fn_with_state(logger, log_request_and_response));
/// # Ok(())
/// # }
/// ```
pub async fn log_request_and_response(
    State(logger): State<Arc<RequestLogger>>,
    request: Request,
    next: Next,
) -> Response {
    if !logger.should_log(request.uri().path()) {
        return next.run(request).await;
    }

    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let (request, captured) = body::capture_request(request, logger.max_body_bytes).await;

    let request_record =
        logger.request_record(request.method(), request.uri(), request.headers(), &captured);
    info!(
        target: targets::HTTP,
        http_request = %request_record,
        first_operation = true,
        "Request {method} {path}"
    );

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => {
            let (response, captured) =
                body::capture_response(response, logger.max_body_bytes).await;
            log_response(&logger, &method, &path, &response, &captured, started);
            response
        }
        Err(payload) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let mut record = logger.response_record(
                status,
                &HeaderMap::new(),
                &CapturedBody::NotCaptured,
                started.elapsed(),
            );
            record["error"] = Value::String(panic_message(payload.as_ref()));
            record["data"] = Value::Null;
            error!(
                target: targets::HTTP,
                http_response = %record,
                last_operation = true,
                "Response {method} {path} > {}",
                status.as_u16()
            );
            panic::resume_unwind(payload)
        }
    }
}

fn log_response(
    logger: &RequestLogger,
    method: &Method,
    path: &str,
    response: &Response,
    captured: &CapturedBody,
    started: Instant,
) {
    let status = response.status();
    let record = logger.response_record(status, response.headers(), captured, started.elapsed());
    let code = status.as_u16();

    if status.is_success() {
        info!(
            target: targets::HTTP,
            http_response = %record,
            last_operation = true,
            "Response {method} {path} > {code}"
        );
    } else {
        warn!(
            target: targets::HTTP,
            http_response = %record,
            last_operation = true,
            "Response {method} {path} > {code}"
        );
    }
}
