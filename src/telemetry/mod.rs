//! Structured logging for tradelog.
//!
//! This module provides the logging facade:
//! - [`Logger`] with `info`, `verbose`, `error` and `debug` entry points
//! - JSON rendering of `tracing` events via [`JsonLayer`]
//! - Configuration, per-call fields and debug options
//!
//! # Feature Flags
//!
//! - `release-logs`: Strip verbose entries at compile time
//! - `max-perf`: Disable all logging for maximum performance

mod config;
mod debug;
pub mod fields;
mod init;
mod layer;
mod logger;

pub use config::{LoggerConfig, Severity, LOG_LEVEL_ENV};
pub use debug::{DebugLevel, DebugOptions};
pub use fields::{FieldValue, Fields, RESERVED_KEYS};
pub use init::init_logger;
pub use layer::JsonLayer;
pub use logger::{Logger, DIAGNOSTIC_KEY, TARGET};
