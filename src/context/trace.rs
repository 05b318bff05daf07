// ABOUTME: Trace context propagated by the caller through W3C or Google Cloud trace headers
// ABOUTME: Parses traceparent and X-Cloud-Trace-Context into a trace id, span id, and sampling flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::HeaderMap;
use serde::Serialize;
use structured_logger_core::constants::headers;

/// Trace identifiers read from the incoming request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceContext {
    /// 32 lowercase hex characters
    pub trace_id: String,
    /// 16 lowercase hex characters
    pub span_id: Option<String>,
    /// Whether the caller sampled this trace
    pub sampled: bool,
}

impl TraceContext {
    /// Read the trace from `traceparent`, falling back to `X-Cloud-Trace-Context`
    #[must_use]
    pub fn from_headers(request_headers: &HeaderMap) -> Option<Self> {
        let header = |name: &str| request_headers.get(name).and_then(|value| value.to_str().ok());

        header(headers::TRACEPARENT)
            .and_then(Self::parse_traceparent)
            .or_else(|| header(headers::CLOUD_TRACE_CONTEXT).and_then(Self::parse_cloud_trace))
    }

    /// Parse a W3C `traceparent` value: `{version}-{trace_id}-{parent_id}-{flags}`
    #[must_use]
    pub fn parse_traceparent(value: &str) -> Option<Self> {
        let mut parts = value.trim().split('-');
        let version = parts.next()?;
        let trace_id = parts.next()?;
        let parent_id = parts.next()?;
        let flags = parts.next()?;

        if !is_hex(version, 2) || version.eq_ignore_ascii_case("ff") {
            return None;
        }
        // Version 00 has exactly four fields
        if version == "00" && parts.next().is_some() {
            return None;
        }
        if !is_hex(trace_id, 32) || !is_hex(parent_id, 16) || !is_hex(flags, 2) {
            return None;
        }
        if is_zero(trace_id) || is_zero(parent_id) {
            return None;
        }

        let flags = u8::from_str_radix(flags, 16).ok()?;
        Some(Self {
            trace_id: trace_id.to_ascii_lowercase(),
            span_id: Some(parent_id.to_ascii_lowercase()),
            sampled: flags & 0x01 == 0x01,
        })
    }

    /// Parse an `X-Cloud-Trace-Context` value: `TRACE_ID[/SPAN_ID][;o=OPTIONS]`
    ///
    /// The decimal span id is converted to the 16-digit hex form Cloud Logging expects.
    #[must_use]
    pub fn parse_cloud_trace(value: &str) -> Option<Self> {
        let (ids, options) = value
            .trim()
            .split_once(';')
            .map_or((value.trim(), None), |(ids, options)| (ids, Some(options)));

        let (trace_id, span_id) = ids
            .split_once('/')
            .map_or((ids, None), |(trace, span)| (trace, Some(span)));

        if !is_hex(trace_id, 32) || is_zero(trace_id) {
            return None;
        }

        let span_id = span_id
            .and_then(|span| span.parse::<u64>().ok())
            .filter(|span| *span != 0)
            .map(|span| format!("{span:016x}"));

        let sampled = options
            .and_then(|options| options.trim().strip_prefix("o="))
            .is_some_and(|flag| flag.trim() == "1");

        Some(Self {
            trace_id: trace_id.to_ascii_lowercase(),
            span_id,
            sampled,
        })
    }

    /// Cloud Logging trace resource name
    #[must_use]
    pub fn resource_name(&self, project_id: &str) -> String {
        format!("projects/{project_id}/traces/{}", self.trace_id)
    }
}

fn is_hex(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_zero(value: &str) -> bool {
    value.bytes().all(|b| b == b'0')
}
