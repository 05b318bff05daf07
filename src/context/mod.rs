// ABOUTME: Per-request identity context shared by the middleware and the log formatters
// ABOUTME: Task-local identity store, trace header parsing, and authenticated user resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Request identity context
//!
//! Every log statement emitted while a request is handled carries the
//! identity of the user who made it. The identity lives in tokio task-local
//! storage, so concurrent requests never observe each other's values.
//!
//! - `identity`: the [`RequestIdentity`] value and its scoped store
//! - `trace`: W3C `traceparent` and `X-Cloud-Trace-Context` parsing
//! - `user`: the [`UserAttributes`] seam the host's auth layer implements

/// Scoped identity store
pub mod identity;
/// Distributed trace context
pub mod trace;
/// Authenticated user resolution
pub mod user;

pub use identity::RequestIdentity;
pub use trace::TraceContext;
pub use user::{resolve_identity, AuthenticatedUser, UserAttributes};
