// ABOUTME: Task-local store holding the identity of the request being handled
// ABOUTME: Scoped per request task so concurrent requests never see each other's identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::trace::TraceContext;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::future::Future;
use uuid::Uuid;

tokio::task_local! {
    static CURRENT_IDENTITY: RefCell<Option<RequestIdentity>>;
}

/// Identity attached to every log record emitted while a request is handled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestIdentity {
    /// Operation id shared by all records of the request
    pub uuid: String,
    /// Configured user id attribute, if the user is known
    pub user_id: Option<Value>,
    /// Configured user display attribute, if the user is known
    pub user_display: Option<Value>,
    /// Trace propagated by the caller
    pub trace: Option<TraceContext>,
}

impl RequestIdentity {
    /// Identity with the given operation id and no user
    #[must_use]
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            user_id: None,
            user_display: None,
            trace: None,
        }
    }

    /// Identity with a freshly generated operation id
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Attach user attributes; empty strings and null count as absent
    #[must_use]
    pub fn with_user(mut self, user_id: Option<Value>, user_display: Option<Value>) -> Self {
        self.user_id = user_id.filter(is_present);
        self.user_display = user_display.filter(is_present);
        self
    }

    /// Attach a propagated trace
    #[must_use]
    pub fn with_trace(mut self, trace: Option<TraceContext>) -> Self {
        self.trace = trace;
        self
    }

    /// User id rendered as a label value
    #[must_use]
    pub fn user_id_label(&self) -> Option<String> {
        self.user_id.as_ref().map(label_text)
    }

    /// User display value rendered as a label value
    #[must_use]
    pub fn user_display_label(&self) -> Option<String> {
        self.user_display.as_ref().map(label_text)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Run `future` with `identity` as the current identity
///
/// The slot is discarded when the future completes. Tasks spawned inside the
/// future do not inherit it.
pub async fn scope<F>(identity: Option<RequestIdentity>, future: F) -> F::Output
where
    F: Future,
{
    CURRENT_IDENTITY.scope(RefCell::new(identity), future).await
}

/// Run `f` on the current thread with `identity` as the current identity
pub fn sync_scope<F, R>(identity: Option<RequestIdentity>, f: F) -> R
where
    F: FnOnce() -> R,
{
    CURRENT_IDENTITY.sync_scope(RefCell::new(identity), f)
}

/// Replace the identity of the enclosing scope
///
/// Returns `false` and stores nothing when called outside any scope.
pub fn set(identity: RequestIdentity) -> bool {
    CURRENT_IDENTITY
        .try_with(|slot| {
            slot.replace(Some(identity));
        })
        .is_ok()
}

/// Identity of the enclosing scope, if any
#[must_use]
pub fn current() -> Option<RequestIdentity> {
    CURRENT_IDENTITY
        .try_with(|slot| slot.try_borrow().ok().and_then(|identity| identity.clone()))
        .ok()
        .flatten()
}

/// Whether the caller runs inside an identity scope
#[must_use]
pub fn in_scope() -> bool {
    CURRENT_IDENTITY.try_with(|_| ()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::task;

    #[test]
    fn test_outside_scope_is_empty() {
        assert!(current().is_none());
        assert!(!in_scope());
        assert!(!set(RequestIdentity::new("orphan")));
        assert!(current().is_none());
    }

    #[test]
    fn test_set_inside_sync_scope() {
        sync_scope(None, || {
            assert!(current().is_none());
            assert!(set(RequestIdentity::new("op-1")));
            assert_eq!(current().map(|i| i.uuid), Some("op-1".to_owned()));
        });
        assert!(current().is_none());
    }

    #[test]
    fn test_empty_user_values_are_absent() {
        let identity = RequestIdentity::new("op")
            .with_user(Some(json!("")), Some(Value::Null));
        assert!(identity.user_id.is_none());
        assert!(identity.user_display.is_none());

        let identity = RequestIdentity::new("op").with_user(Some(json!(42)), Some(json!("a@b.c")));
        assert_eq!(identity.user_id_label().as_deref(), Some("42"));
        assert_eq!(identity.user_display_label().as_deref(), Some("a@b.c"));
    }

    #[tokio::test]
    async fn test_async_scopes_are_isolated() {
        let a = scope(Some(RequestIdentity::new("a")), async {
            task::yield_now().await;
            current().map(|i| i.uuid)
        });
        let b = scope(Some(RequestIdentity::new("b")), async {
            task::yield_now().await;
            current().map(|i| i.uuid)
        });
        let (a, b) = tokio::join!(a, b);
        assert_eq!(a.as_deref(), Some("a"));
        assert_eq!(b.as_deref(), Some("b"));
    }
}
