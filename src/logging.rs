// ABOUTME: Logging configuration and subscriber setup for the structured JSON formatters
// ABOUTME: Builds an EnvFilter with noise reduction and installs the selected formatter on stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Subscriber configuration with structured output

use crate::config::logging::LoggerSettings;
use crate::formatters::{FormatterKind, GoogleCloudFormat, StandardJsonFormat};
use std::env;
use std::io;
use structured_logger_core::errors::{AppError, AppResult};
use tracing::subscriber::set_global_default;
use tracing::{info, Level, Subscriber};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Default service name reported at startup
pub const DEFAULT_SERVICE_NAME: &str = "google-structured-logger";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directives (trace, debug, info, warn, error)
    pub level: String,
    /// Line format
    pub formatter: FormatterKind,
    /// Project used for Cloud Logging trace correlation
    pub google_cloud_project: Option<String>,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            formatter: FormatterKind::Standard,
            google_cloud_project: None,
            service_name: DEFAULT_SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::from_settings(&LoggerSettings::from_env());
        config.level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        config.service_name =
            env::var("SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.into());
        if let Ok(version) = env::var("SERVICE_VERSION") {
            config.service_version = version;
        }
        config
    }

    /// Take the formatter and project from already loaded logger settings
    #[must_use]
    pub fn from_settings(settings: &LoggerSettings) -> Self {
        Self {
            formatter: settings.formatter,
            google_cloud_project: settings.google_cloud_project.clone(),
            ..Self::default()
        }
    }

    /// Filter that always applies our noise reduction rules on top of `level`
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(&self.level);
        for directive in ["hyper=warn", "hyper::proto=warn", "h2=warn", "tower=info", "tower_http=info"] {
            filter = filter.add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| Level::WARN.into()),
            );
        }
        // Keep our application logs at desired level
        filter.add_directive(
            format!("google_structured_logger={}", self.level)
                .parse()
                .unwrap_or_else(|_| Level::INFO.into()),
        )
    }

    /// Build the configured subscriber writing lines to `writer`
    #[must_use]
    pub fn subscriber_with_writer<W>(&self, writer: W) -> Box<dyn Subscriber + Send + Sync>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        match self.formatter {
            FormatterKind::Standard => Box::new(
                registry.with(
                    fmt::layer()
                        .event_format(StandardJsonFormat)
                        .with_writer(writer),
                ),
            ),
            FormatterKind::GoogleCloud => Box::new(
                registry.with(
                    fmt::layer()
                        .event_format(GoogleCloudFormat::new(self.google_cloud_project.clone()))
                        .with_writer(writer),
                ),
            ),
            FormatterKind::Text => Box::new(
                registry.with(
                    fmt::layer()
                        .with_file(true)
                        .with_line_number(true)
                        .with_target(true)
                        .with_writer(writer),
                ),
            ),
        }
    }

    /// Initialize the global tracing subscriber on stdout
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::LoggingInit` if a global subscriber is already installed
    pub fn init(&self) -> AppResult<()> {
        set_global_default(self.subscriber_with_writer(io::stdout)).map_err(|e| {
            AppError::logging_init("a global tracing subscriber is already installed")
                .with_source(e)
        })?;

        self.log_startup_info();
        Ok(())
    }

    /// Log structured startup information
    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            log.level = %self.level,
            log.formatter = %self.formatter,
            google_cloud_project = self.google_cloud_project.as_deref().unwrap_or(""),
            "Structured logging initialized"
        );
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> AppResult<()> {
    LoggingConfig::from_env().init()
}
