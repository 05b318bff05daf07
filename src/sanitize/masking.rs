// ABOUTME: Sensitive-key masking policy compiled once from configured regex patterns
// ABOUTME: Matches field names case-insensitively and renders partial, complete, or custom masks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::logging::MaskStyle;
use regex::{Regex, RegexSet, RegexSetBuilder};
use serde_json::Value;
use structured_logger_core::constants::markers;
use structured_logger_core::errors::{AppError, AppResult};

/// Ordered set of sensitive-key patterns plus the replacement style
#[derive(Debug, Clone)]
pub struct MaskingPolicy {
    patterns: RegexSet,
    style: MaskStyle,
}

impl MaskingPolicy {
    /// Compile `patterns` into a policy
    ///
    /// Each pattern is anchored at the start of the key, so `.*token.*`
    /// matches anywhere while `^password$` only matches the exact name.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::InvalidPattern` naming the first pattern that does not compile
    pub fn new<I, S>(patterns: I, style: MaskStyle) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let originals: Vec<String> = patterns
            .into_iter()
            .map(|pattern| pattern.as_ref().to_owned())
            .collect();

        let anchored = originals.iter().map(|pattern| format!("^(?:{pattern})"));
        let patterns = RegexSetBuilder::new(anchored)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                let culprit = originals
                    .iter()
                    .find(|pattern| Regex::new(pattern).is_err())
                    .map_or("<pattern set>", String::as_str);
                AppError::invalid_pattern(culprit).with_source(e)
            })?;

        Ok(Self { patterns, style })
    }

    /// Policy that never masks anything
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            patterns: RegexSet::empty(),
            style: MaskStyle::Partial,
        }
    }

    /// Whether `key` names a sensitive field
    #[must_use]
    pub fn is_sensitive(&self, key: &str) -> bool {
        self.patterns.is_match(key)
    }

    /// Render the masked replacement for `value`
    ///
    /// Non-string values are masked through their compact JSON text.
    #[must_use]
    pub fn mask(&self, value: &Value) -> Value {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Value::String(self.mask_str(&text))
    }

    /// Render the masked replacement for a string
    #[must_use]
    pub fn mask_str(&self, text: &str) -> String {
        match &self.style {
            MaskStyle::Complete => markers::FULL_MASK.to_owned(),
            MaskStyle::Partial => partial_mask(text),
            MaskStyle::Custom { template } => custom_mask(template, text),
        }
    }
}

fn reveal_len(len: usize) -> usize {
    (len / 4).min(markers::PARTIAL_MASK_MAX_REVEAL)
}

fn partial_mask(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= markers::PARTIAL_MASK_MIN_LEN {
        return markers::FULL_MASK.to_owned();
    }
    let k = reveal_len(chars.len());
    let prefix: String = chars[..k].iter().collect();
    let suffix: String = chars[chars.len() - k..].iter().collect();
    format!("{prefix}{}{suffix}", markers::PARTIAL_MASK)
}

fn custom_mask(template: &str, text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let k = if chars.len() <= markers::PARTIAL_MASK_MIN_LEN {
        0
    } else {
        reveal_len(chars.len())
    };
    let prefix: String = chars[..k].iter().collect();
    let suffix: String = chars[chars.len() - k..].iter().collect();
    template
        .replace("{prefix}", &prefix)
        .replace("{suffix}", &suffix)
        .replace("{length}", &chars.len().to_string())
        .replace("{data}", text)
}
