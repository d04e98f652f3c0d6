//! Logger initialization.
//!
//! Builds the `tracing` pipeline behind a [`Logger`]: a registry with an
//! `EnvFilter` for the configured severity and a [`JsonLayer`] writing to
//! stderr (or an injected writer).

use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use super::config::{LoggerConfig, Severity};
use super::layer::JsonLayer;
use super::logger::Logger;
use crate::error::LogError;
use crate::runtime::{ProcessProbe, RuntimeProbe};

/// Create a logger writing JSON entries to stderr.
///
/// `log_level` selects the minimum severity: exactly `"DEBUG"` lets
/// verbose entries through, anything else keeps the informational floor.
/// Call once during startup and share the result.
///
/// Runtime diagnostics come from a default [`ProcessProbe`], whose build
/// info names this crate. Replace it with [`Logger::with_probe`] to report
/// the application's own package:
///
/// ```rust
/// use std::sync::Arc;
/// use tradelog::{init_logger, ProcessProbe};
///
/// let probe = ProcessProbe::new().with_build_info(Some(tradelog::build_info!()));
/// let logger = init_logger("orders", "matching", "INFO").with_probe(Arc::new(probe));
/// ```
///
/// # Example
///
/// ```rust
/// use tradelog::{init_logger, Fields};
///
/// let logger = init_logger("orders", "matching", "INFO");
/// logger.info("ready", &Fields::new());
/// ```
pub fn init_logger(app_name: &str, app_module_name: &str, log_level: &str) -> Logger {
    let config =
        LoggerConfig::new(app_name, app_module_name).with_level(Severity::from_name(log_level));
    Logger::new(&config)
}

impl Logger {
    /// Create a logger writing to stderr. An unparsable filter directive
    /// falls back to the configured severity.
    pub fn new(config: &LoggerConfig) -> Self {
        Self::with_writer(config, std::io::stderr)
    }

    /// Like [`Logger::new`], but rejects an unparsable filter directive.
    pub fn try_new(config: &LoggerConfig) -> Result<Self, LogError> {
        let filter = strict_filter(config)?;
        Ok(Self::assemble(config, filter, std::io::stderr))
    }

    /// Create a logger writing to `make_writer` instead of stderr.
    pub fn with_writer<W>(config: &LoggerConfig, make_writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let filter = strict_filter(config).unwrap_or_else(|_| severity_filter(config.level));
        Self::assemble(config, filter, make_writer)
    }

    /// Read runtime diagnostics from `probe` instead of the live process.
    pub fn with_probe(mut self, probe: Arc<dyn RuntimeProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Make this logger's sink the process-wide default, so plain
    /// `tracing` events from any crate are written the same way.
    ///
    /// Fails if a global subscriber is already installed.
    pub fn install_global(&self) -> Result<(), LogError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }

    fn assemble<W>(config: &LoggerConfig, filter: EnvFilter, make_writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let layer = JsonLayer::new(&config.app_name, &config.module_name, make_writer)
            .with_source(config.include_source);

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);

        Self {
            name: Arc::from(config.app_name.as_str()),
            module: Arc::from(config.module_name.as_str()),
            severity: config.level,
            dispatch: Dispatch::new(subscriber),
            probe: Arc::new(ProcessProbe::new()),
        }
    }
}

fn severity_filter(level: Severity) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.level_filter().into())
        .parse_lossy("")
}

fn strict_filter(config: &LoggerConfig) -> Result<EnvFilter, LogError> {
    let Some(directive) = config.filter_directive.as_deref() else {
        return Ok(severity_filter(config.level));
    };

    EnvFilter::builder()
        .with_default_directive(config.level.level_filter().into())
        .parse(directive)
        .map_err(|e| LogError::InvalidFilter(format!("{directive}: {e}")))
}
