// ABOUTME: Seam between the host's authentication layer and the request identity
// ABOUTME: Reads configured user attributes, request id, and trace headers into a RequestIdentity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::identity::RequestIdentity;
use super::trace::TraceContext;
use crate::config::logging::LoggerSettings;
use http::HeaderMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use structured_logger_core::errors::{AppError, AppResult};
use tracing::warn;

/// Attribute lookup on whatever user type the host application authenticates
pub trait UserAttributes: Send + Sync {
    /// Value of `field`, `Ok(None)` when the user has no such attribute
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute exists but cannot be read
    fn attribute(&self, field: &str) -> AppResult<Option<Value>>;

    /// Whether this user passed authentication
    fn is_authenticated(&self) -> bool {
        true
    }
}

impl UserAttributes for Value {
    fn attribute(&self, field: &str) -> AppResult<Option<Value>> {
        match self {
            Self::Object(map) => Ok(map.get(field).cloned()),
            Self::Null => Ok(None),
            _ => Err(AppError::user_resolution(field, "user is not a JSON object")),
        }
    }

    fn is_authenticated(&self) -> bool {
        !self.is_null()
    }
}

/// Request extension inserted by the host's auth layer
///
/// ```rust
/// use google_structured_logger::context::AuthenticatedUser;
/// use serde_json::json;
///
/// let user = AuthenticatedUser::new(json!({"id": 7, "email": "ada@example.com"}));
/// assert!(user.is_authenticated());
/// ```
#[derive(Clone)]
pub struct AuthenticatedUser(pub Arc<dyn UserAttributes>);

impl AuthenticatedUser {
    /// Wrap a user value
    pub fn new<U>(user: U) -> Self
    where
        U: UserAttributes + 'static,
    {
        Self(Arc::new(user))
    }

    /// Whether the wrapped user passed authentication
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.0.is_authenticated()
    }

    /// Attribute lookup that never fails; errors are logged and read as absent
    #[must_use]
    pub fn attribute_or_none(&self, field: &str) -> Option<Value> {
        match self.0.attribute(field) {
            Ok(value) => value,
            Err(e) => {
                warn!(field, error = %e, "Failed to read user attribute for log context");
                None
            }
        }
    }
}

impl fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Build the identity of a request
///
/// The operation id comes from `settings.request_id_header` when the caller
/// sent one, otherwise a fresh UUID is generated. Anonymous and
/// unauthenticated users produce an identity without user attributes.
#[must_use]
pub fn resolve_identity(
    user: Option<&AuthenticatedUser>,
    settings: &LoggerSettings,
    request_headers: &HeaderMap,
) -> RequestIdentity {
    let identity = request_headers
        .get(settings.request_id_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(RequestIdentity::generate, RequestIdentity::new)
        .with_trace(TraceContext::from_headers(request_headers));

    match user.filter(|user| user.is_authenticated()) {
        Some(user) => identity.with_user(
            user.attribute_or_none(&settings.user_id_field),
            user.attribute_or_none(&settings.user_display_field),
        ),
        None => identity,
    }
}
