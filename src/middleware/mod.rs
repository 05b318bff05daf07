// ABOUTME: HTTP middleware for request identity propagation and request/response logging
// ABOUTME: axum middleware functions plus the body capture and filtering rules they share
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Body capture and rendering
pub mod body;
/// Endpoint and header exclusion
pub mod filtering;
/// Request/response logging middleware
pub mod request_logging;
/// User context middleware
pub mod user_context;

// Request/response records
pub use request_logging::{log_request_and_response, RequestLogger};

// Identity propagation
pub use user_context::set_user_context_middleware;

// Exclusion rules
pub use filtering::{EndpointFilter, HeaderFilter};
