// ABOUTME: Main library entry point for Google structured request logging
// ABOUTME: Request/response logging middleware, identity context, masking, and JSON log formatters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Google Structured Logger
//!
//! Structured request logging for axum services, shaped for Google Cloud Logging.
//!
//! ## Features
//!
//! - **Request/response records**: method, path, query, headers, body and
//!   status logged around every request
//! - **Identity context**: the authenticated user's id, display value and
//!   operation id attached to every log line emitted while a request is handled
//! - **Masking and truncation**: sensitive keys masked, long strings, long
//!   sequences and deep nesting cut before anything is logged
//! - **JSON formatters**: a standard shape and the Cloud Logging shape with
//!   `logging.googleapis.com/*` keys and trace correlation
//!
//! ## Architecture
//!
//! - **Config**: `LoggerSettings` loaded once from `LOG_*` variables
//! - **Context**: task-local `RequestIdentity` store
//! - **Sanitize**: truncate-and-mask traversal over `serde_json::Value`
//! - **Middleware**: `set_user_context_middleware` and `log_request_and_response`
//! - **Formatters**: `StandardJsonFormat` and `GoogleCloudFormat`
//! - **Logging**: subscriber setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use google_structured_logger::config::LoggerSettings;
//! use google_structured_logger::logging::LoggingConfig;
//! use google_structured_logger::middleware::{
//!     log_request_and_response, set_user_context_middleware, RequestLogger,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = LoggerSettings::from_env();
//!     LoggingConfig::from_settings(&settings).init()?;
//!
//!     let logger = Arc::new(RequestLogger::from_settings(&settings)?);
//!     let app: Router = Router::new()
//!         .route("/", get(|| async { "ok" }))
//!         .layer(middleware::from_fn_with_state(logger, log_request_and_response))
//!         .layer(middleware::from_fn_with_state(
//!             Arc::new(settings),
//!             set_user_context_middleware,
//!         ));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

/// Logger settings
pub mod config;

/// Request identity context
pub mod context;

/// Unified error handling
pub mod errors {
    pub use structured_logger_core::errors::*;
}

/// Log line formatters
pub mod formatters;

/// Subscriber setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Truncate-and-mask traversal
pub mod sanitize;
