// ABOUTME: Demo server wiring the identity and request logging middleware onto an axum router
// ABOUTME: Authenticates callers from a demo header so every log line carries their identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Structured Logger Demo Binary
//!
//! Starts an HTTP server whose requests are logged as structured JSON. Send
//! `x-demo-user: {"id": 1, "email": "ada@example.com"}` to act as a user.

use anyhow::Result;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use google_structured_logger::config::LoggerSettings;
use google_structured_logger::context::AuthenticatedUser;
use google_structured_logger::logging::LoggingConfig;
use google_structured_logger::middleware::{
    log_request_and_response, set_user_context_middleware, RequestLogger,
};
use serde_json::{json, Value};
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

const DEMO_USER_HEADER: &str = "x-demo-user";

#[tokio::main]
async fn main() -> Result<()> {
    let settings = LoggerSettings::from_env();
    let mut logging = LoggingConfig::from_env();
    logging.service_name = "structured-logger-demo".into();
    logging.init()?;

    let logger = Arc::new(RequestLogger::from_settings(&settings)?);
    let settings = Arc::new(settings);

    // Layers run bottom-up: auth, then identity, then request logging
    let app = Router::new()
        .route("/", get(index))
        .route("/echo", post(echo))
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn_with_state(logger, log_request_and_response))
        .layer(middleware::from_fn_with_state(settings, set_user_context_middleware))
        .layer(middleware::from_fn(demo_auth));

    let port = env::var("PORT").unwrap_or_else(|_| "8080".into());
    let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!(port = %port, "Demo server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Stand-in for a real auth layer: trusts a JSON user object from a header
async fn demo_auth(mut request: Request, next: Next) -> Response {
    let user = request
        .headers()
        .get(DEMO_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(serde_json::from_str::<Value>);

    match user {
        Some(Ok(user)) => {
            request.extensions_mut().insert(AuthenticatedUser::new(user));
        }
        Some(Err(e)) => warn!(error = %e, "Ignoring malformed demo user header"),
        None => {}
    }
    next.run(request).await
}

async fn index() -> Json<Value> {
    info!(raw_token = "abc", "Handling index");
    Json(json!({"status": "ok"}))
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down demo server");
}
