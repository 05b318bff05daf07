// ABOUTME: Standard JSON log line with severity, source location, identity labels, and operation
// ABOUTME: Event fields are copied verbatim and override defaults; labels and operation merge key by key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::visitor::CapturedEvent;
use crate::context::{identity, RequestIdentity};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::fmt;
use structured_logger_core::constants::fields;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Emits the standard JSON entry for every event
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardJsonFormat;

impl<S, N> FormatEvent<S, N> for StandardJsonFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let identity = identity::current();
        let entry = build_entry(
            event.metadata(),
            CapturedEvent::from_event(event),
            identity.as_ref(),
            Utc::now(),
        );
        write_entry(writer, entry)
    }
}

/// Serialize `entry` as one line
pub(crate) fn write_entry(mut writer: Writer<'_>, entry: Map<String, Value>) -> fmt::Result {
    let line = serde_json::to_string(&Value::Object(entry)).map_err(|_| fmt::Error)?;
    writeln!(writer, "{line}")
}

/// Cloud Logging severity name for a tracing level
#[must_use]
pub fn severity(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG | Level::TRACE => "DEBUG",
    }
}

/// Assemble the standard entry for one event
///
/// Defaults come first, then every captured field is inserted verbatim and
/// overrides a default of the same name. `labels` and `operation` objects
/// supplied by the caller are merged into the defaults instead, and the
/// `first_operation` / `last_operation` fields drive `operation.first` /
/// `operation.last`.
#[must_use]
pub fn build_entry(
    metadata: &Metadata<'_>,
    captured: CapturedEvent,
    identity: Option<&RequestIdentity>,
    timestamp: DateTime<Utc>,
) -> Map<String, Value> {
    let CapturedEvent {
        message,
        fields: mut extras,
    } = captured;

    let mut labels = identity_labels(identity);
    if let Some(Value::Object(caller)) = extras.remove(fields::LABELS) {
        labels.extend(caller);
    }
    for value in labels.values_mut() {
        stringify(value);
    }

    let mut operation = Map::new();
    operation.insert(
        "id".to_owned(),
        identity.map_or(Value::Null, |identity| Value::String(identity.uuid.clone())),
    );
    operation.insert("first".to_owned(), Value::Bool(flag(&extras, fields::FIRST_OPERATION)));
    operation.insert("last".to_owned(), Value::Bool(flag(&extras, fields::LAST_OPERATION)));
    if let Some(Value::Object(caller)) = extras.remove(fields::OPERATION) {
        operation.extend(caller);
    }

    let mut entry = Map::new();
    entry.insert(
        fields::MESSAGE.to_owned(),
        Value::String(message.unwrap_or_default()),
    );
    entry.insert(
        fields::SEVERITY.to_owned(),
        Value::String(severity(metadata.level()).to_owned()),
    );
    entry.insert(
        fields::TIMESTAMP.to_owned(),
        Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
    );
    entry.insert(
        fields::SOURCE_LOCATION.to_owned(),
        json!({
            "file": metadata.file(),
            "line": metadata.line(),
            "function": metadata.module_path(),
            "logger_name": metadata.target(),
        }),
    );
    entry.insert(fields::LABELS.to_owned(), Value::Object(labels));
    entry.insert(fields::OPERATION.to_owned(), Value::Object(operation));
    entry.extend(extras);
    entry
}

fn identity_labels(identity: Option<&RequestIdentity>) -> Map<String, Value> {
    let mut labels = Map::new();
    let Some(identity) = identity else {
        return labels;
    };
    if let Some(user_id) = identity.user_id_label() {
        labels.insert(fields::LABEL_USER_ID.to_owned(), Value::String(user_id));
    }
    if let Some(display) = identity.user_display_label() {
        labels.insert(fields::LABEL_USER_DISPLAY.to_owned(), Value::String(display));
    }
    labels
}

/// Label values must be strings
fn stringify(value: &mut Value) {
    if !value.is_string() {
        *value = Value::String(value.to_string());
    }
}

fn flag(extras: &Map<String, Value>, key: &str) -> bool {
    match extras.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
