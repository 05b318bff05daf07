// ABOUTME: Middleware binding the authenticated user's identity to the request task
// ABOUTME: Every log statement emitted while the request is handled carries that identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::logging::LoggerSettings;
use crate::context::{identity, resolve_identity, AuthenticatedUser, RequestIdentity};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::debug;

/// User context middleware that scopes the request identity to the request task
///
/// This middleware:
/// 1. Reads the `AuthenticatedUser` extension inserted by the host's auth layer
/// 2. Resolves the configured user id and display attributes, the request id and the trace headers
/// 3. Runs the rest of the request inside a fresh identity scope
///
/// When an identity scope is already active (nested routers), the identity is
/// updated in place and keeps its operation id. Resolution never rejects a
/// request: anonymous requests get an identity without user attributes.
///
/// Layer it outside [`super::log_request_and_response`] and inside the auth layer.
///
/// # Example
///
/// ```rust,no_run
/// use axum::{middleware, routing::get, Router};
/// use google_structured_logger::config::logging::LoggerSettings;
/// use google_structured_logger::middleware::set_user_context_middleware;
/// use std::sync::Arc;
///
/// # async fn handler() -> &'static str { "" }
/// let settings = Arc::new(LoggerSettings::default());
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(middleware::from_fn_with_state(settings, set_user_context_middleware));
/// ```
pub async fn set_user_context_middleware(
    State(settings): State<Arc<LoggerSettings>>,
    request: Request,
    next: Next,
) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>().cloned();
    let resolved = resolve_identity(user.as_ref(), &settings, request.headers());

    if identity::in_scope() {
        let updated = match identity::current() {
            Some(existing) => {
                debug!(operation_id = %existing.uuid, "Updating existing request identity");
                RequestIdentity {
                    uuid: existing.uuid,
                    ..resolved
                }
            }
            None => resolved,
        };
        identity::set(updated);
        return next.run(request).await;
    }

    identity::scope(Some(resolved), next.run(request)).await
}
