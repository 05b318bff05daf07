// ABOUTME: Request logging, masking, and truncation configuration types
// ABOUTME: Loads LOG_* settings once from the environment or from any serde source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::formatters::FormatterKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use structured_logger_core::constants::{headers, policy};
use tracing::warn;

/// How a value under a sensitive key is replaced
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskStyle {
    /// Keep a short prefix and suffix, mask the middle
    #[default]
    #[serde(alias = "partially")]
    Partial,
    /// Replace the whole value
    #[serde(alias = "full")]
    Complete,
    /// Render a template with `{prefix}`, `{suffix}`, `{length}` and `{data}` placeholders
    Custom {
        /// Replacement template
        template: String,
    },
}

impl MaskStyle {
    /// Parse a style name, using `template` when the name is `custom`
    ///
    /// Unknown names fall back to [`MaskStyle::Partial`] with a warning.
    #[must_use]
    pub fn parse_or_default(name: &str, template: Option<String>) -> Self {
        match name.trim().to_lowercase().as_str() {
            "partial" | "partially" => Self::Partial,
            "complete" | "full" => Self::Complete,
            "custom" => Self::Custom {
                template: template
                    .unwrap_or_else(|| policy::DEFAULT_CUSTOM_MASK_TEMPLATE.to_owned()),
            },
            other => {
                warn!(mask_style = %other, "Invalid mask style, using default style 'partial'");
                Self::Partial
            }
        }
    }
}

/// Settings for the request/response logging middleware and the formatters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Strings longer than this many characters are truncated (0 disables)
    pub max_str_len: usize,
    /// Sequences longer than this are truncated (0 disables)
    pub max_list_len: usize,
    /// Subtrees nested deeper than this are replaced by a marker
    pub max_depth: usize,
    /// Request paths that produce no log records (`*` suffix for prefix match)
    ///
    /// Paths whose first segment starts with `__`, such as `/__debug__/` or
    /// `/__health`, are skipped in addition to these entries.
    pub excluded_endpoints: Vec<String>,
    /// Regex patterns matched against field names
    pub sensitive_keys: Vec<String>,
    /// Replacement applied to sensitive values
    pub mask_style: MaskStyle,
    /// Master switch for the request/response logging middleware
    pub middleware_enabled: bool,
    /// Header names dropped before logging (case-insensitive)
    pub excluded_headers: Vec<String>,
    /// User attribute logged as the user id
    pub user_id_field: String,
    /// User attribute logged as the user display value
    pub user_display_field: String,
    /// Formatter installed by [`crate::logging::LoggingConfig::init`]
    pub formatter: FormatterKind,
    /// Project used to build Google Cloud trace resource names
    pub google_cloud_project: Option<String>,
    /// Bodies larger than this are not buffered for logging
    pub max_body_bytes: usize,
    /// Header carrying an upstream request id reused as operation id
    pub request_id_header: String,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            max_str_len: policy::DEFAULT_MAX_STR_LEN,
            max_list_len: policy::DEFAULT_MAX_LIST_LEN,
            max_depth: policy::DEFAULT_MAX_DEPTH,
            excluded_endpoints: Vec::new(),
            sensitive_keys: to_owned_list(policy::DEFAULT_SENSITIVE_KEYS),
            mask_style: MaskStyle::Partial,
            middleware_enabled: true,
            excluded_headers: to_owned_list(policy::DEFAULT_EXCLUDED_HEADERS),
            user_id_field: "id".to_owned(),
            user_display_field: "email".to_owned(),
            formatter: FormatterKind::Standard,
            google_cloud_project: None,
            max_body_bytes: policy::DEFAULT_MAX_BODY_BYTES,
            request_id_header: headers::REQUEST_ID.to_owned(),
        }
    }
}

impl LoggerSettings {
    /// Load settings from `LOG_*` environment variables
    ///
    /// Missing variables keep their defaults; unparsable values fall back to
    /// the default with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mask_style = env::var("LOG_MASK_STYLE").map_or(defaults.mask_style, |style| {
            MaskStyle::parse_or_default(&style, env::var("LOG_MASK_CUSTOM_STYLE").ok())
        });

        let formatter = env::var("LOG_FORMATTER_CLASS")
            .map_or(defaults.formatter, |name| FormatterKind::parse_or_default(&name));

        Self {
            max_str_len: env_parse_or("LOG_MAX_STR_LEN", defaults.max_str_len),
            max_list_len: env_parse_or("LOG_MAX_LIST_LEN", defaults.max_list_len),
            max_depth: env_parse_or("LOG_MAX_DEPTH", defaults.max_depth),
            excluded_endpoints: env_list_or("LOG_EXCLUDED_ENDPOINTS", defaults.excluded_endpoints),
            sensitive_keys: env_list_or("LOG_SENSITIVE_KEYS", defaults.sensitive_keys),
            mask_style,
            middleware_enabled: env_bool_or("LOG_MIDDLEWARE_ENABLED", defaults.middleware_enabled),
            excluded_headers: env_list_or("LOG_EXCLUDED_HEADERS", defaults.excluded_headers),
            user_id_field: env_var_or("LOG_USER_ID_FIELD", &defaults.user_id_field),
            user_display_field: env_var_or("LOG_USER_DISPLAY_FIELD", &defaults.user_display_field),
            formatter,
            google_cloud_project: env::var("GOOGLE_CLOUD_PROJECT")
                .ok()
                .filter(|project| !project.trim().is_empty()),
            max_body_bytes: env_parse_or("LOG_MAX_BODY_BYTES", defaults.max_body_bytes),
            request_id_header: env_var_or("LOG_REQUEST_ID_HEADER", &defaults.request_id_header)
                .to_lowercase(),
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|&item| item.to_owned()).collect()
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, keeping `default` when it is missing or invalid
fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Invalid logger setting, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Boolean switch: `false`, `0`, `no` and `off` disable, anything else enables
fn env_bool_or(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |raw| {
        !matches!(
            raw.trim().to_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        )
    })
}

/// Parse a comma-separated environment variable; an empty value yields an empty list
fn env_list_or(key: &str, default: Vec<String>) -> Vec<String> {
    env::var(key).map_or(default, |raw| parse_list(&raw))
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
