// ABOUTME: Logging configuration and structured logging setup for observability
// ABOUTME: Configures log levels, formats, and env-filter driven output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use std::env;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
        }
    }
}

impl LoggingConfig {
    /// Build configuration from environment variables.
    ///
    /// `RUST_LOG` wins for the filter; `COACH_LOG_FORMAT` selects the format
    /// (`json`, `pretty`, `compact`).
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = match env::var("COACH_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };
        Self {
            level,
            format,
            ..Self::default()
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
/// Returns `TryInitError` if a global subscriber is already installed
/// (embedders and tests may install their own).
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let fmt_layer = fmt::layer()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_thread_names(config.include_thread);

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .try_init(),
    }
}
