// ABOUTME: Bounded request/response body capture and content-type aware rendering for log records
// ABOUTME: Buffers only bodies with a known small size and passes read failures on unchanged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::sanitize::Sanitizer;
use axum::body::{to_bytes, Body, Bytes, HttpBody};
use axum::extract::Request;
use axum::response::Response;
use futures_util::{future, stream};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Uri};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::str;
use structured_logger_core::constants::{markers, targets};
use structured_logger_core::errors::AppError;
use tracing::warn;
use url::form_urlencoded;

/// Body as seen by the logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedBody {
    /// Fully buffered body
    Buffered(Bytes),
    /// Body too large, unbounded, or capture disabled
    NotCaptured,
}

impl CapturedBody {
    /// Render for a log record
    #[must_use]
    pub fn render(&self, content_type: Option<&str>, sanitizer: &Sanitizer) -> Value {
        match self {
            Self::Buffered(bytes) => render_body(content_type, bytes, sanitizer),
            Self::NotCaptured => Value::String(markers::BODY_NOT_CAPTURED.to_owned()),
        }
    }
}

/// Whether a body with this size hint fits the capture limit (0 disables capture)
fn fits(body: &Body, max_bytes: usize) -> bool {
    if max_bytes == 0 {
        return false;
    }
    body.size_hint()
        .upper()
        .is_some_and(|upper| upper <= max_bytes as u64)
}

/// Body handed on after a capture read failed; it yields `error` on first poll
fn failed_body(error: AppError) -> Body {
    Body::from_stream(stream::once(future::ready(Err::<Bytes, _>(error))))
}

/// Buffer the request body when it fits, returning an equivalent request
///
/// A body that fails while being buffered is replaced by one that fails the
/// same way, so the handler decides what the failure means.
pub async fn capture_request(request: Request, max_bytes: usize) -> (Request, CapturedBody) {
    if !fits(request.body(), max_bytes) {
        return (request, CapturedBody::NotCaptured);
    }

    let (parts, body) = request.into_parts();
    match to_bytes(body, max_bytes).await {
        Ok(bytes) => (
            Request::from_parts(parts, Body::from(bytes.clone())),
            CapturedBody::Buffered(bytes),
        ),
        Err(e) => {
            warn!(target: targets::HTTP, error = %e, "Failed to read request body for logging");
            let error = AppError::body_read("request body failed while buffered for logging")
                .with_source(e);
            (
                Request::from_parts(parts, failed_body(error)),
                CapturedBody::NotCaptured,
            )
        }
    }
}

/// Buffer the response body when it fits, returning an equivalent response
///
/// A failing response body keeps its status and headers and fails again when
/// the client reads it.
pub async fn capture_response(response: Response, max_bytes: usize) -> (Response, CapturedBody) {
    if !fits(response.body(), max_bytes) {
        return (response, CapturedBody::NotCaptured);
    }

    let (parts, body) = response.into_parts();
    match to_bytes(body, max_bytes).await {
        Ok(bytes) => (
            Response::from_parts(parts, Body::from(bytes.clone())),
            CapturedBody::Buffered(bytes),
        ),
        Err(e) => {
            warn!(target: targets::HTTP, error = %e, "Failed to read response body for logging");
            let error = AppError::body_read("response body failed while buffered for logging")
                .with_source(e);
            (
                Response::from_parts(parts, failed_body(error)),
                CapturedBody::NotCaptured,
            )
        }
    }
}

/// `type/subtype` of the Content-Type header, lowercased and without parameters
#[must_use]
pub fn content_type_essence(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().to_lowercase())
        .filter(|essence| !essence.is_empty())
}

/// Render a body for logging according to its content type
///
/// - empty body: `null`
/// - `multipart/form-data`: placeholder
/// - JSON (`application/json`, `*+json`): parsed and sanitized, invalid JSON logged as text
/// - `application/x-www-form-urlencoded`: decoded into an object and sanitized
/// - `text/*` or no content type: sanitized text
/// - anything else: `"[{content_type} body omitted]"`
#[must_use]
pub fn render_body(content_type: Option<&str>, body: &[u8], sanitizer: &Sanitizer) -> Value {
    if body.is_empty() {
        return Value::Null;
    }

    match content_type {
        Some("multipart/form-data") => Value::String(markers::MULTIPART_BODY.to_owned()),
        Some(ct) if ct == "application/json" || ct.ends_with("+json") => {
            serde_json::from_slice::<Value>(body).map_or_else(
                |_| render_text(body, sanitizer),
                |json| sanitizer.sanitize(&json),
            )
        }
        Some("application/x-www-form-urlencoded") => {
            sanitizer.sanitize(&Value::Object(decode_pairs(form_urlencoded::parse(body))))
        }
        Some(ct) if ct.starts_with("text/") => render_text(body, sanitizer),
        None => str::from_utf8(body).map_or_else(
            |_| Value::String("[binary body omitted]".to_owned()),
            |text| sanitizer.sanitize(&Value::String(text.to_owned())),
        ),
        Some(ct) => Value::String(format!("[{ct} body omitted]")),
    }
}

fn render_text(body: &[u8], sanitizer: &Sanitizer) -> Value {
    sanitizer.sanitize(&Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Decoded query string as a JSON object, `None` when there is no query
///
/// Repeated keys collect into an array.
#[must_use]
pub fn query_params(uri: &Uri) -> Option<Map<String, Value>> {
    let query = uri.query().filter(|query| !query.is_empty())?;
    let params = decode_pairs(form_urlencoded::parse(query.as_bytes()));
    (!params.is_empty()).then_some(params)
}

fn decode_pairs<'a, I>(pairs: I) -> Map<String, Value>
where
    I: Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
{
    let mut params = Map::new();
    for (key, value) in pairs {
        let value = Value::String(value.into_owned());
        match params.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                params.insert(key.into_owned(), value);
            }
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::logging::LoggerSettings;
    use serde_json::json;

    fn sanitizer() -> Sanitizer {
        Sanitizer::from_settings(&LoggerSettings::default()).unwrap()
    }

    #[test]
    fn test_render_by_content_type() {
        let s = sanitizer();
        assert_eq!(
            render_body(Some("application/json"), br#"{"password":"secret123"}"#, &s),
            json!({"password": "se.....MASKED.....23"})
        );
        assert_eq!(
            render_body(Some("multipart/form-data"), b"--boundary", &s),
            json!(markers::MULTIPART_BODY)
        );
        assert_eq!(render_body(Some("text/plain"), b"hello", &s), json!("hello"));
        assert_eq!(
            render_body(Some("image/png"), &[0x89, 0x50], &s),
            json!("[image/png body omitted]")
        );
        assert_eq!(render_body(Some("application/json"), b"", &s), Value::Null);
        assert_eq!(render_body(Some("application/json"), b"not json", &s), json!("not json"));
    }

    #[test]
    fn test_form_body_is_masked() {
        assert_eq!(
            render_body(
                Some("application/x-www-form-urlencoded"),
                b"login=ada&password=hunter22",
                &sanitizer()
            ),
            json!({"login": "ada", "password": "hu.....MASKED.....22"})
        );
    }

    #[test]
    fn test_query_params_collect_repeats() {
        let uri: Uri = "/items?tag=a&tag=b&page=2".parse().unwrap();
        assert_eq!(
            Value::Object(query_params(&uri).unwrap()),
            json!({"tag": ["a", "b"], "page": "2"})
        );
        assert!(query_params(&"/items".parse().unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_failed_body_yields_its_error() {
        let err = to_bytes(failed_body(AppError::body_read("peer went away")), 64)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("peer went away"), "{err}");
    }

    #[test]
    fn test_content_type_essence() {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, "Application/JSON; charset=utf-8".parse().unwrap());
        assert_eq!(content_type_essence(&map).as_deref(), Some("application/json"));
    }
}
