//! Logger configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::level_filters::LevelFilter;

use crate::error::LogError;

/// Environment variable read by [`LoggerConfig::from_env`] for the severity.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Minimum severity written by a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    /// Informational entries and above
    #[default]
    Info,
    /// Verbose entries as well
    Debug,
}

impl Severity {
    /// Parse a severity selector. Only the exact string `"DEBUG"` selects
    /// [`Severity::Debug`]; anything else falls back to [`Severity::Info`].
    pub fn from_name(name: &str) -> Self {
        if name == "DEBUG" {
            Severity::Debug
        } else {
            Severity::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Level filter applied by the sink.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Severity::Info => LevelFilter::INFO,
            Severity::Debug => LevelFilter::DEBUG,
        }
    }
}

impl From<String> for Severity {
    fn from(name: String) -> Self {
        Severity::from_name(&name)
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a [`Logger`](crate::Logger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Logical component name, written as `logger` on every entry
    pub app_name: String,
    /// Module name, written as `module` on every entry
    pub module_name: String,
    /// Minimum severity
    pub level: Severity,
    /// Whether to write the `source` file/line of each entry
    pub include_source: bool,
    /// Custom `EnvFilter` directive (overrides `level` if set)
    pub filter_directive: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            module_name: String::new(),
            level: Severity::Info,
            include_source: true,
            filter_directive: None,
        }
    }
}

impl LoggerConfig {
    /// Configuration with the default severity.
    pub fn new(app_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            module_name: module_name.into(),
            ..Self::default()
        }
    }

    /// Create a development configuration (verbose entries included).
    pub fn development(app_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self::new(app_name, module_name).with_level(Severity::Debug)
    }

    /// Create a production configuration.
    pub fn production(app_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self::new(app_name, module_name).with_level(Severity::Info)
    }

    /// Configuration from the environment: `LOG_LEVEL` selects the
    /// severity and `RUST_LOG`, when set, becomes the filter directive.
    pub fn from_env(app_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        let level = std::env::var(LOG_LEVEL_ENV)
            .map(|name| Severity::from_name(&name))
            .unwrap_or_default();
        let filter_directive = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|directive| !directive.trim().is_empty());

        Self {
            level,
            filter_directive,
            ..Self::new(app_name, module_name)
        }
    }

    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, LogError> {
        let config: LoggerConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn with_source(mut self, include_source: bool) -> Self {
        self.include_source = include_source;
        self
    }

    pub fn with_filter_directive(mut self, directive: impl Into<String>) -> Self {
        self.filter_directive = Some(directive.into());
        self
    }
}
