// ABOUTME: tracing event formatters emitting one JSON object per log line
// ABOUTME: Standard JSON shape and the Google Cloud Logging shape, selected once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Log Line Formatters
//!
//! Each formatter is a [`tracing_subscriber::fmt::FormatEvent`] that turns an
//! event plus the current [`crate::context::RequestIdentity`] into one JSON
//! line.
//!
//! ## Supported Formats
//!
//! - **Standard**: `source_location`, `labels`, `operation` under plain keys
//! - **Google Cloud**: the same entry under the `logging.googleapis.com/*`
//!   keys Cloud Logging parses, plus trace correlation
//! - **Text**: the stock human readable `tracing_subscriber` format for local development
//!
//! ## Usage
//!
//! ```rust,no_run
//! use google_structured_logger::formatters::GoogleCloudFormat;
//! use tracing_subscriber::fmt;
//!
//! let layer = fmt::layer::<tracing_subscriber::Registry>().event_format(GoogleCloudFormat::new(Some("my-project".to_owned())));
//! # drop(layer);
//! ```

/// Google Cloud Logging formatter
pub mod google;
/// Standard JSON formatter and the shared entry builder
pub mod standard;
/// Event field visitor
pub mod visitor;

pub use google::GoogleCloudFormat;
pub use standard::{build_entry, StandardJsonFormat};
pub use visitor::CapturedEvent;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Formatter installed for the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatterKind {
    /// Generic JSON shape
    #[default]
    #[serde(alias = "json")]
    Standard,
    /// Google Cloud Logging JSON shape
    #[serde(alias = "google", alias = "gcp")]
    GoogleCloud,
    /// Human readable text
    #[serde(alias = "pretty")]
    Text,
}

impl FormatterKind {
    /// Parse a formatter name
    ///
    /// Accepts the short names (`standard`, `google`, `text`) as well as
    /// dotted class paths ending in `StandardJSONFormatter` or
    /// `GoogleCloudFormatter`. Unknown names fall back to
    /// [`FormatterKind::Standard`] with a warning.
    #[must_use]
    pub fn parse_or_default(name: &str) -> Self {
        let normalized = name.trim().to_lowercase();
        let last_segment = normalized.rsplit('.').next().unwrap_or(normalized.as_str());

        match last_segment {
            "standard" | "json" | "standard_json" | "standardjsonformatter" => Self::Standard,
            "google" | "gcp" | "google_cloud" | "googlecloudformatter" => Self::GoogleCloud,
            "text" | "pretty" => Self::Text,
            other => {
                warn!(formatter = %other, "Unknown log formatter, using standard JSON");
                Self::Standard
            }
        }
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standard => "standard",
            Self::GoogleCloud => "google_cloud",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}
