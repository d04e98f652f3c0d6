//! Error types.
//!
//! [`DomainError`] is the contract the logger needs from an application
//! error; [`TradingError`] is a ready-made implementation of it.
//! [`LogError`] covers the failures of this crate's own fallible calls.

use std::error::Error as StdError;

use thiserror::Error;

/// An application error that carries a stable code, free-form details and
/// the underlying cause it wraps.
///
/// The human-readable message is the error's `Display` output.
pub trait DomainError: StdError {
    /// Stable, machine-matchable error code.
    fn error_code(&self) -> &str;

    /// Extra context about the failure.
    fn details(&self) -> &str;

    /// The failure this error wraps, if any.
    fn original_error(&self) -> Option<&(dyn StdError + 'static)>;
}

/// Domain error raised by trading components.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TradingError {
    message: String,
    code: String,
    details: String,
    #[source]
    original: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl TradingError {
    /// Create an error with a message and code and no cause.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: String::new(),
            original: None,
        }
    }

    /// Attach details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Attach the underlying cause.
    pub fn with_original<E>(mut self, original: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        self.original = Some(original.into());
        self
    }
}

impl DomainError for TradingError {
    fn error_code(&self) -> &str {
        &self.code
    }

    fn details(&self) -> &str {
        &self.details
    }

    fn original_error(&self) -> Option<&(dyn StdError + 'static)> {
        self.original
            .as_deref()
            .map(|original| original as &(dyn StdError + 'static))
    }
}

/// Errors returned by the fallible parts of the logging API.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Invalid field '{key}': {reason}")]
    InvalidField { key: String, reason: &'static str },

    #[error("Invalid filter directive: {0}")]
    InvalidFilter(String),

    #[error("A global logger is already installed")]
    GlobalAlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),
}
