// ABOUTME: Field visitor collecting a tracing event's message and structured fields as JSON
// ABOUTME: Fields keep their recorded text except reserved objects, which are parsed back into JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{Map, Number, Value};
use std::error::Error;
use std::fmt::Debug;
use structured_logger_core::constants::fields;
use tracing::field::{Field, Visit};

/// Fields recorded as JSON text that are embedded as objects
const STRUCTURED_FIELDS: &[&str] = &[
    fields::LABELS,
    fields::OPERATION,
    fields::HTTP_REQUEST,
    fields::HTTP_RESPONSE,
];

/// Message and extra fields recorded on one event
#[derive(Debug, Default)]
pub struct CapturedEvent {
    /// Formatted message, if the event had one
    pub message: Option<String>,
    /// Every other field, in recording order
    pub fields: Map<String, Value>,
}

impl CapturedEvent {
    /// Record every field of `event`
    #[must_use]
    pub fn from_event(event: &tracing::Event<'_>) -> Self {
        let mut captured = Self::default();
        event.record(&mut captured);
        captured
    }

    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == fields::MESSAGE {
            self.message = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_owned(), value);
        }
    }
}

impl Visit for CapturedEvent {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let number = Number::from_f64(value).map_or(Value::Null, Value::Number);
        self.insert(field, number);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_i128(&mut self, field: &Field, value: i128) {
        let number = i64::try_from(value).map_or_else(|_| Value::String(value.to_string()), Value::from);
        self.insert(field, number);
    }

    fn record_u128(&mut self, field: &Field, value: u128) {
        let number = u64::try_from(value).map_or_else(|_| Value::String(value.to_string()), Value::from);
        self.insert(field, number);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_owned()));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let text = format!("{value:?}");
        if field.name() == fields::MESSAGE {
            self.message = Some(text);
            return;
        }
        if STRUCTURED_FIELDS.contains(&field.name()) {
            self.insert(field, parse_structured(text));
        } else {
            self.insert(field, Value::String(text));
        }
    }
}

/// Parse text holding a JSON object or array, otherwise keep the text
fn parse_structured(text: String) -> Value {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str::<Value>(&text) {
            return parsed;
        }
    }
    Value::String(text)
}
