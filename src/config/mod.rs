// ABOUTME: Configuration module for the request logging middleware and formatters
// ABOUTME: Settings are loaded once at startup from LOG_* environment variables or any serde source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module
//!
//! - **Logging**: truncation limits, masking policy, header and endpoint
//!   exclusions, user attribute names and formatter selection

/// Request logging, masking, and formatter settings
pub mod logging;

pub use logging::{LoggerSettings, MaskStyle};
