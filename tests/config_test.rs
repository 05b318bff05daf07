// ABOUTME: Tests for logger settings loaded from LOG_* environment variables and serde sources
// ABOUTME: Covers defaults, list parsing, invalid value fallback, mask styles, and formatter selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use google_structured_logger::config::{LoggerSettings, MaskStyle};
use google_structured_logger::errors::ErrorCode;
use google_structured_logger::formatters::FormatterKind;
use google_structured_logger::logging::LoggingConfig;
use serde_json::json;
use serial_test::serial;
use std::env;

const LOGGER_VARS: &[&str] = &[
    "LOG_MAX_STR_LEN",
    "LOG_MAX_LIST_LEN",
    "LOG_MAX_DEPTH",
    "LOG_EXCLUDED_ENDPOINTS",
    "LOG_SENSITIVE_KEYS",
    "LOG_MASK_STYLE",
    "LOG_MASK_CUSTOM_STYLE",
    "LOG_MIDDLEWARE_ENABLED",
    "LOG_EXCLUDED_HEADERS",
    "LOG_USER_ID_FIELD",
    "LOG_USER_DISPLAY_FIELD",
    "LOG_FORMATTER_CLASS",
    "LOG_MAX_BODY_BYTES",
    "LOG_REQUEST_ID_HEADER",
    "GOOGLE_CLOUD_PROJECT",
    "RUST_LOG",
    "SERVICE_NAME",
];

fn clear_logger_env() {
    for var in LOGGER_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_logger_env();
    let settings = LoggerSettings::from_env();

    assert_eq!(settings, LoggerSettings::default());
    assert_eq!(settings.max_str_len, 200);
    assert_eq!(settings.max_list_len, 10);
    assert_eq!(settings.max_depth, 4);
    assert!(settings.middleware_enabled);
    assert!(settings.excluded_endpoints.is_empty());
    assert!(settings.sensitive_keys.contains(&"^password$".to_owned()));
    assert!(settings.excluded_headers.contains(&"Authorization".to_owned()));
    assert_eq!(settings.user_id_field, "id");
    assert_eq!(settings.user_display_field, "email");
    assert_eq!(settings.formatter, FormatterKind::Standard);
    assert_eq!(settings.google_cloud_project, None);
    assert_eq!(settings.request_id_header, "x-request-id");
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_logger_env();
    env::set_var("LOG_MAX_STR_LEN", "50");
    env::set_var("LOG_MAX_LIST_LEN", "3");
    env::set_var("LOG_MAX_DEPTH", "2");
    env::set_var("LOG_EXCLUDED_ENDPOINTS", "/health/, /metrics/*");
    env::set_var("LOG_SENSITIVE_KEYS", "^pin$,.*secret.*");
    env::set_var("LOG_MIDDLEWARE_ENABLED", "false");
    env::set_var("LOG_EXCLUDED_HEADERS", "Cookie");
    env::set_var("LOG_USER_ID_FIELD", "pk");
    env::set_var("LOG_USER_DISPLAY_FIELD", "username");
    env::set_var("LOG_REQUEST_ID_HEADER", "X-Correlation-Id");
    env::set_var("GOOGLE_CLOUD_PROJECT", "demo-project");

    let settings = LoggerSettings::from_env();
    clear_logger_env();

    assert_eq!(settings.max_str_len, 50);
    assert_eq!(settings.max_list_len, 3);
    assert_eq!(settings.max_depth, 2);
    assert_eq!(settings.excluded_endpoints, vec!["/health/", "/metrics/*"]);
    assert_eq!(settings.sensitive_keys, vec!["^pin$", ".*secret.*"]);
    assert!(!settings.middleware_enabled);
    assert_eq!(settings.excluded_headers, vec!["Cookie"]);
    assert_eq!(settings.user_id_field, "pk");
    assert_eq!(settings.user_display_field, "username");
    assert_eq!(settings.request_id_header, "x-correlation-id");
    assert_eq!(settings.google_cloud_project.as_deref(), Some("demo-project"));
}

#[test]
#[serial]
fn test_invalid_numbers_fall_back_to_defaults() {
    clear_logger_env();
    env::set_var("LOG_MAX_STR_LEN", "lots");
    env::set_var("LOG_MAX_DEPTH", "-1");

    let settings = LoggerSettings::from_env();
    clear_logger_env();

    assert_eq!(settings.max_str_len, 200);
    assert_eq!(settings.max_depth, 4);
}

#[test]
#[serial]
fn test_empty_list_disables_defaults() {
    clear_logger_env();
    env::set_var("LOG_SENSITIVE_KEYS", "");

    let settings = LoggerSettings::from_env();
    clear_logger_env();

    assert!(settings.sensitive_keys.is_empty());
}

#[test]
#[serial]
fn test_mask_style_from_environment() {
    clear_logger_env();
    env::set_var("LOG_MASK_STYLE", "complete");
    assert_eq!(LoggerSettings::from_env().mask_style, MaskStyle::Complete);

    env::set_var("LOG_MASK_STYLE", "custom");
    env::set_var("LOG_MASK_CUSTOM_STYLE", "{prefix}###{suffix}");
    assert_eq!(
        LoggerSettings::from_env().mask_style,
        MaskStyle::Custom {
            template: "{prefix}###{suffix}".to_owned()
        }
    );

    env::set_var("LOG_MASK_STYLE", "sparkly");
    assert_eq!(LoggerSettings::from_env().mask_style, MaskStyle::Partial);
    clear_logger_env();
}

#[test]
#[serial]
fn test_middleware_switch_values() {
    clear_logger_env();
    for (raw, expected) in [("0", false), ("off", false), ("No", false), ("true", true), ("1", true)] {
        env::set_var("LOG_MIDDLEWARE_ENABLED", raw);
        assert_eq!(LoggerSettings::from_env().middleware_enabled, expected, "{raw}");
    }
    clear_logger_env();
}

#[test]
#[serial]
fn test_formatter_selection() {
    clear_logger_env();
    env::set_var("LOG_FORMATTER_CLASS", "google");
    assert_eq!(LoggerSettings::from_env().formatter, FormatterKind::GoogleCloud);

    env::set_var("LOG_FORMATTER_CLASS", "app.logging.StandardJSONFormatter");
    assert_eq!(LoggerSettings::from_env().formatter, FormatterKind::Standard);

    env::set_var("LOG_FORMATTER_CLASS", "yaml");
    assert_eq!(LoggerSettings::from_env().formatter, FormatterKind::Standard);
    clear_logger_env();
}

#[test]
#[serial]
fn test_blank_project_is_ignored() {
    clear_logger_env();
    env::set_var("GOOGLE_CLOUD_PROJECT", "   ");
    let settings = LoggerSettings::from_env();
    clear_logger_env();

    assert_eq!(settings.google_cloud_project, None);
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    clear_logger_env();
    env::set_var("RUST_LOG", "debug");
    env::set_var("SERVICE_NAME", "billing");
    env::set_var("LOG_FORMATTER_CLASS", "gcp");
    env::set_var("GOOGLE_CLOUD_PROJECT", "demo-project");

    let config = LoggingConfig::from_env();
    clear_logger_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.service_name, "billing");
    assert_eq!(config.formatter, FormatterKind::GoogleCloud);
    assert_eq!(config.google_cloud_project.as_deref(), Some("demo-project"));
}

#[test]
fn test_settings_deserialize_with_partial_input() {
    let settings: LoggerSettings = serde_json::from_value(json!({
        "max_str_len": 20,
        "mask_style": "complete",
        "formatter": "google",
        "excluded_endpoints": ["/health/"],
    }))
    .unwrap();

    assert_eq!(settings.max_str_len, 20);
    assert_eq!(settings.max_list_len, 10);
    assert_eq!(settings.mask_style, MaskStyle::Complete);
    assert_eq!(settings.formatter, FormatterKind::GoogleCloud);
    assert_eq!(settings.excluded_endpoints, vec!["/health/"]);
    assert!(settings.middleware_enabled);
}

#[test]
fn test_custom_mask_style_deserializes_with_template() {
    let style: MaskStyle =
        serde_json::from_value(json!({"custom": {"template": "<{length}>"}})).unwrap();
    assert_eq!(
        style,
        MaskStyle::Custom {
            template: "<{length}>".to_owned()
        }
    );
}

#[test]
#[serial]
fn test_second_init_reports_logging_init() {
    let config = LoggingConfig::default();
    // Whichever call installs the subscriber, a later one must fail
    let _ = config.init();

    let err = config.init().unwrap_err();
    assert_eq!(err.code, ErrorCode::LoggingInit);
    assert!(err.source.is_some());
}
