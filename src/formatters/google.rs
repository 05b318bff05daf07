// ABOUTME: Google Cloud Logging formatter mapping the standard entry onto reserved logging.googleapis.com keys
// ABOUTME: Adds trace, span id, and sampling fields when the request carried a trace and a project is set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::standard::{build_entry, write_entry};
use super::visitor::CapturedEvent;
use crate::context::{identity, RequestIdentity};
use chrono::Utc;
use serde_json::{Map, Value};
use std::fmt;
use structured_logger_core::constants::{fields, google};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const RENAMED: [(&str, &str); 3] = [
    (fields::SOURCE_LOCATION, google::SOURCE_LOCATION),
    (fields::OPERATION, google::OPERATION),
    (fields::LABELS, google::LABELS),
];

/// Emits entries in the shape Cloud Logging parses from stdout
#[derive(Debug, Clone, Default)]
pub struct GoogleCloudFormat {
    project_id: Option<String>,
}

impl GoogleCloudFormat {
    /// Formatter correlating traces under `project_id`
    #[must_use]
    pub fn new(project_id: Option<String>) -> Self {
        Self {
            project_id: project_id.filter(|project| !project.trim().is_empty()),
        }
    }

    /// Project used for trace resource names
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Rewrite a standard entry into the Cloud Logging shape
    #[must_use]
    pub fn to_google_entry(
        &self,
        mut entry: Map<String, Value>,
        identity: Option<&RequestIdentity>,
    ) -> Map<String, Value> {
        for (standard_key, google_key) in RENAMED {
            let Some(value) = entry.remove(standard_key) else {
                continue;
            };
            let merged = match (value, entry.remove(google_key)) {
                (Value::Object(mut ours), Some(Value::Object(caller))) => {
                    ours.extend(caller);
                    Value::Object(ours)
                }
                (_, Some(caller)) => caller,
                (ours, None) => ours,
            };
            entry.insert(google_key.to_owned(), merged);
        }

        let trace = identity.and_then(|identity| identity.trace.as_ref());
        if let (Some(project), Some(trace)) = (self.project_id(), trace) {
            entry
                .entry(google::TRACE)
                .or_insert_with(|| Value::String(trace.resource_name(project)));
            if let Some(span_id) = &trace.span_id {
                entry
                    .entry(google::SPAN_ID)
                    .or_insert_with(|| Value::String(span_id.clone()));
            }
            entry
                .entry(google::TRACE_SAMPLED)
                .or_insert(Value::Bool(trace.sampled));
        }
        entry
    }
}

impl<S, N> FormatEvent<S, N> for GoogleCloudFormat
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
        write_entry(writer, self.to_google_entry(entry, identity.as_ref()))
    }
}
