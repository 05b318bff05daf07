// ABOUTME: Endpoint and header exclusion rules for the request logging middleware
// ABOUTME: Matches excluded paths exactly or by prefix and drops excluded headers case-insensitively
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::HeaderMap;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Paths that never produce request/response records
#[derive(Debug, Clone, Default)]
pub struct EndpointFilter {
    exact: HashSet<String>,
    prefixes: Vec<String>,
}

impl EndpointFilter {
    /// Build from configured entries; a trailing `*` turns an entry into a prefix match
    #[must_use]
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for endpoint in endpoints {
            let endpoint = endpoint.as_ref().trim();
            if endpoint.is_empty() {
                continue;
            }
            match endpoint.strip_suffix('*') {
                Some(prefix) => filter.prefixes.push(prefix.to_owned()),
                None => {
                    filter.exact.insert(endpoint.to_owned());
                }
            }
        }
        filter
    }

    /// Whether requests to `path` are skipped
    ///
    /// Paths whose first segment starts with `__` (debug tooling such as
    /// `/__debug__/`) are always skipped.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        if path.trim_start_matches('/').starts_with("__") {
            return true;
        }
        self.exact.contains(path) || self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}

/// Header names removed before headers are logged
#[derive(Debug, Clone, Default)]
pub struct HeaderFilter {
    excluded: HashSet<String>,
}

impl HeaderFilter {
    /// Build from configured header names, compared case-insensitively
    #[must_use]
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            excluded: excluded
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Whether `name` is excluded
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(&name.to_lowercase())
    }

    /// Headers that survive exclusion as a JSON object, `None` when nothing remains
    ///
    /// Repeated headers are joined with `", "`; non UTF-8 values are decoded lossily.
    #[must_use]
    pub fn filter(&self, headers: &HeaderMap) -> Option<Map<String, Value>> {
        let mut kept = Map::new();
        for (name, value) in headers {
            if self.is_excluded(name.as_str()) {
                continue;
            }
            let text = String::from_utf8_lossy(value.as_bytes()).into_owned();
            match kept.get_mut(name.as_str()) {
                Some(Value::String(existing)) => {
                    existing.push_str(", ");
                    existing.push_str(&text);
                }
                _ => {
                    kept.insert(name.as_str().to_owned(), Value::String(text));
                }
            }
        }
        (!kept.is_empty()).then_some(kept)
    }
}
