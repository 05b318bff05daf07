// ABOUTME: Core types and constants for the Google structured request logger
// ABOUTME: Foundation crate with error handling and the default masking policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Structured Logger Core
//!
//! Foundation crate providing shared types and constants for the structured
//! request logger. It is designed to change infrequently.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: default policies, traversal markers and reserved field names

/// Unified error handling with standard error codes
pub mod errors;

/// Constants organized by domain
pub mod constants;
