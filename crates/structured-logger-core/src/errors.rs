// ABOUTME: Unified error type and error codes for the structured request logger
// ABOUTME: Provides AppError with code, message, and source chaining
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Errors are returned only at startup (uncompilable patterns, subscriber
//! installation). Failures while a request is being handled are logged, and
//! a body that fails during capture carries an `AppError` back to whoever
//! reads it next.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A sensitive-key pattern failed to compile
    #[serde(rename = "INVALID_PATTERN")]
    InvalidPattern,
    /// A user attribute could not be read
    #[serde(rename = "USER_RESOLUTION")]
    UserResolution,
    /// A request or response body failed while buffered for logging
    #[serde(rename = "BODY_READ")]
    BodyRead,
    /// The global tracing subscriber could not be installed
    #[serde(rename = "LOGGING_INIT")]
    LoggingInit,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidPattern => "Sensitive key pattern is not a valid regular expression",
            Self::UserResolution => "User attribute could not be resolved",
            Self::BodyRead => "Failed to read body",
            Self::LoggingInit => "Logging subscriber could not be initialized",
        }
    }
}

/// Unified error type for the logger
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sensitive-key pattern that does not compile
    pub fn invalid_pattern(pattern: &str) -> Self {
        Self::new(
            ErrorCode::InvalidPattern,
            format!("cannot compile sensitive key pattern `{pattern}`"),
        )
    }

    /// User attribute lookup failure
    pub fn user_resolution(field: &str, message: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UserResolution,
            format!("cannot read user attribute `{field}`: {message}"),
        )
    }

    /// Body transport failure seen while buffering for a log record
    pub fn body_read(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BodyRead, message)
    }

    /// Global subscriber installation failure
    pub fn logging_init(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LoggingInit, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
