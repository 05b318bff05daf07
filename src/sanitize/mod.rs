// ABOUTME: Bounded truncate-and-mask traversal over JSON-like values before they are logged
// ABOUTME: Limits string length, sequence length, and nesting depth; masks values under sensitive keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Log payload sanitization
//!
//! [`Sanitizer::sanitize`] walks a `serde_json::Value` depth-first and returns
//! a new value of the same shape:
//!
//! - subtrees nested deeper than `max_depth` become `"..DEPTH EXCEEDED"`
//! - values under a key matching the [`MaskingPolicy`] are masked and never descended into
//! - sequences keep their first `max_list_len` elements plus one
//!   `"..SHORTENED(omitted_items=N)"` marker
//! - strings keep their first `max_str_len` characters followed by
//!   `"..SHORTENED(original_length=N)"`
//!
//! ```rust
//! use google_structured_logger::config::logging::LoggerSettings;
//! use google_structured_logger::sanitize::Sanitizer;
//! use serde_json::json;
//!
//! let sanitizer = Sanitizer::from_settings(&LoggerSettings::default()).unwrap();
//! let clean = sanitizer.sanitize(&json!({"password": "secret123", "name": "ada"}));
//! assert_eq!(clean, json!({"password": "se.....MASKED.....23", "name": "ada"}));
//! ```

/// Sensitive-key masking policy
pub mod masking;

pub use masking::MaskingPolicy;

use crate::config::logging::LoggerSettings;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Debug;
use structured_logger_core::constants::markers;
use structured_logger_core::errors::AppResult;

/// Truncation bounds applied during the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationLimits {
    /// Maximum string length in characters (0 disables)
    pub max_str_len: usize,
    /// Maximum sequence length (0 disables)
    pub max_list_len: usize,
    /// Maximum nesting depth; the root value is depth 0
    pub max_depth: usize,
}

impl TruncationLimits {
    /// Limits taken from the logger settings
    #[must_use]
    pub const fn from_settings(settings: &LoggerSettings) -> Self {
        Self {
            max_str_len: settings.max_str_len,
            max_list_len: settings.max_list_len,
            max_depth: settings.max_depth,
        }
    }
}

/// Truncates and masks values before they reach a log record
#[derive(Debug, Clone)]
pub struct Sanitizer {
    limits: TruncationLimits,
    policy: MaskingPolicy,
}

impl Sanitizer {
    /// Create a sanitizer from explicit limits and policy
    #[must_use]
    pub const fn new(limits: TruncationLimits, policy: MaskingPolicy) -> Self {
        Self { limits, policy }
    }

    /// Compile the sanitizer described by `settings`
    ///
    /// # Errors
    ///
    /// Returns an error if a sensitive-key pattern does not compile
    pub fn from_settings(settings: &LoggerSettings) -> AppResult<Self> {
        let policy = MaskingPolicy::new(&settings.sensitive_keys, settings.mask_style.clone())?;
        Ok(Self::new(TruncationLimits::from_settings(settings), policy))
    }

    /// Return a truncated, masked copy of `value`
    #[must_use]
    pub fn sanitize(&self, value: &Value) -> Value {
        self.walk(value, 0)
    }

    /// Serialize `value` and sanitize the result
    ///
    /// Values that cannot be represented as JSON degrade to their `Debug`
    /// text instead of failing the log emission.
    #[must_use]
    pub fn sanitize_serializable<T>(&self, value: &T) -> Value
    where
        T: Serialize + Debug + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(json) => self.sanitize(&json),
            Err(e) => {
                tracing::debug!(error = %e, "Value is not JSON serializable, logging its debug form");
                self.sanitize(&Value::String(format!("{value:?}")))
            }
        }
    }

    /// Truncate a single string
    #[must_use]
    pub fn truncate_str(&self, text: &str) -> String {
        let limit = self.limits.max_str_len;
        if limit == 0 {
            return text.to_owned();
        }
        let length = text.chars().count();
        if length <= limit {
            return text.to_owned();
        }
        let head: String = text.chars().take(limit).collect();
        format!("{head}{}(original_length={length})", markers::SHORTENED)
    }

    fn walk(&self, value: &Value, depth: usize) -> Value {
        if depth > self.limits.max_depth {
            return Value::String(markers::DEPTH_EXCEEDED.to_owned());
        }

        match value {
            Value::Object(map) => Value::Object(self.walk_map(map, depth)),
            Value::Array(items) => Value::Array(self.walk_seq(items, depth)),
            Value::String(text) => Value::String(self.truncate_str(text)),
            scalar => scalar.clone(),
        }
    }

    fn walk_map(&self, map: &Map<String, Value>, depth: usize) -> Map<String, Value> {
        map.iter()
            .map(|(key, child)| {
                let clean = if self.policy.is_sensitive(key) {
                    self.policy.mask(child)
                } else {
                    self.walk(child, depth + 1)
                };
                (key.clone(), clean)
            })
            .collect()
    }

    fn walk_seq(&self, items: &[Value], depth: usize) -> Vec<Value> {
        let limit = self.limits.max_list_len;
        if limit == 0 || items.len() <= limit {
            return items.iter().map(|item| self.walk(item, depth + 1)).collect();
        }

        let mut kept: Vec<Value> = items[..limit]
            .iter()
            .map(|item| self.walk(item, depth + 1))
            .collect();
        let omitted = items.len() - limit;
        kept.push(Value::String(format!(
            "{}(omitted_items={omitted})",
            markers::SHORTENED
        )));
        kept
    }
}
