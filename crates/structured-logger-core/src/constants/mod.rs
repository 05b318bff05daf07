// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Default masking policy, traversal markers, and Google Cloud Logging field names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Pure data constants grouped by domain. Nothing here is read from the
//! environment; see the root crate's `config` module for that.

/// Default masking policy applied when the host configures nothing
pub mod policy {
    /// Regex patterns matched (case-insensitively, anchored at the start) against field names
    pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
        "^password$",
        ".*secret.*",
        ".*token.*",
        ".*key.*",
        ".*pass.*",
        ".*auth.*",
        "^Bearer.*",
        ".*ssn.*",
        ".*credit.*card.*",
        ".*cvv.*",
        ".*dob.*",
        ".*pin.*",
        ".*salt.*",
        ".*encrypt.*",
        ".*api.*",
        ".*jwt.*",
        ".*session.*id.*",
        "^Authorization$",
        ".*user.*name.*",
        ".*address.*",
        ".*phone.*",
        "^otp.*",
    ];

    /// Header names dropped from logged requests and responses
    pub const DEFAULT_EXCLUDED_HEADERS: &[&str] = &[
        "Authorization",
        "Cookie",
        "Set-Cookie",
        "X-API-Key",
        "X-CSRFToken",
        "Proxy-Authorization",
        "If-None-Match",
        "Server",
        "WWW-Authenticate",
        "X-Correlation-ID",
        "X-Frame-Options",
        "Strict-Transport-Security",
        "X-XSS-Protection",
        "X-Content-Type-Options",
        "X-Download-Options",
        "X-Permitted-Cross-Domain-Policies",
    ];

    /// Default maximum string length before truncation
    pub const DEFAULT_MAX_STR_LEN: usize = 200;
    /// Default maximum sequence length before truncation
    pub const DEFAULT_MAX_LIST_LEN: usize = 10;
    /// Default maximum nesting depth
    pub const DEFAULT_MAX_DEPTH: usize = 4;
    /// Default upper bound on bodies buffered for logging (64 KiB)
    pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
    /// Default template for the custom mask style
    pub const DEFAULT_CUSTOM_MASK_TEMPLATE: &str = "{prefix}...{suffix}";
}

/// Replacement strings written by the truncate/mask traversal
pub mod markers {
    /// Replaces a subtree nested deeper than the depth limit
    pub const DEPTH_EXCEEDED: &str = "..DEPTH EXCEEDED";
    /// Prefix of the marker appended to truncated strings and sequences
    pub const SHORTENED: &str = "..SHORTENED";
    /// Full mask
    pub const FULL_MASK: &str = "...FULL_MASKED...";
    /// Separator between the visible prefix and suffix of a partial mask
    pub const PARTIAL_MASK: &str = ".....MASKED.....";
    /// Values this short (in characters) are always fully masked
    pub const PARTIAL_MASK_MIN_LEN: usize = 4;
    /// Upper bound on characters revealed on each side of a partial mask
    pub const PARTIAL_MASK_MAX_REVEAL: usize = 4;
    /// Logged in place of multipart bodies
    pub const MULTIPART_BODY: &str = "[multipart/form-data body omitted]";
    /// Logged in place of bodies that were not buffered
    pub const BODY_NOT_CAPTURED: &str = "[body not captured]";
}

/// Reserved field names of the emitted JSON records
pub mod fields {
    /// Log message
    pub const MESSAGE: &str = "message";
    /// Severity name
    pub const SEVERITY: &str = "severity";
    /// RFC 3339 timestamp
    pub const TIMESTAMP: &str = "timestamp";
    /// Source location object
    pub const SOURCE_LOCATION: &str = "source_location";
    /// Label object
    pub const LABELS: &str = "labels";
    /// Operation object
    pub const OPERATION: &str = "operation";
    /// Request record written by the logging middleware
    pub const HTTP_REQUEST: &str = "http_request";
    /// Response record written by the logging middleware
    pub const HTTP_RESPONSE: &str = "http_response";
    /// Marks the first record of a request
    pub const FIRST_OPERATION: &str = "first_operation";
    /// Marks the last record of a request
    pub const LAST_OPERATION: &str = "last_operation";
    /// User id label
    pub const LABEL_USER_ID: &str = "user_id";
    /// User display label
    pub const LABEL_USER_DISPLAY: &str = "user_display_field";
}

/// Google Cloud Logging reserved keys
///
/// See <https://cloud.google.com/logging/docs/structured-logging#special-payload-fields>
pub mod google {
    /// Source location
    pub const SOURCE_LOCATION: &str = "logging.googleapis.com/sourceLocation";
    /// Operation
    pub const OPERATION: &str = "logging.googleapis.com/operation";
    /// Labels
    pub const LABELS: &str = "logging.googleapis.com/labels";
    /// Trace resource name
    pub const TRACE: &str = "logging.googleapis.com/trace";
    /// Span id
    pub const SPAN_ID: &str = "logging.googleapis.com/spanId";
    /// Trace sampling decision
    pub const TRACE_SAMPLED: &str = "logging.googleapis.com/trace_sampled";
}

/// HTTP header names read by the middleware
pub mod headers {
    /// Default request id header
    pub const REQUEST_ID: &str = "x-request-id";
    /// W3C trace context
    pub const TRACEPARENT: &str = "traceparent";
    /// Google Cloud trace context
    pub const CLOUD_TRACE_CONTEXT: &str = "x-cloud-trace-context";
}

/// Tracing targets used by the middleware
pub mod targets {
    /// Request/response records
    pub const HTTP: &str = "google_structured_logger::http";
}
