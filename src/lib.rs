//! tradelog - structured JSON logging with on-demand runtime diagnostics.
//!
//! A [`Logger`] is built once at startup and shared with every call site
//! that logs. It writes one JSON object per entry to stderr, tags each
//! entry with the application name and module, and can append runtime
//! diagnostics (stack trace, memory and collection statistics, build
//! metadata) to a debug entry.
//!
//! ```rust,no_run
//! use tradelog::{fields, init_logger, DebugLevel, DebugOptions, Fields};
//!
//! let logger = init_logger("orders", "matching", "DEBUG");
//! logger.info("engine started", &Fields::new());
//!
//! let fields = fields!["book" => "BTC-USD", "depth" => 42].unwrap_or_default();
//! logger.debug("book rebuilt", &DebugOptions::enabled(DebugLevel::Mem), &fields);
//! ```

pub mod error;
pub mod runtime;
pub mod telemetry;

pub use error::{DomainError, LogError, TradingError};
pub use runtime::{BuildInfo, CollectionRecorder, ProcessProbe, RuntimeProbe, TrackingAllocator};
pub use telemetry::{
    init_logger, DebugLevel, DebugOptions, FieldValue, Fields, Logger, LoggerConfig, Severity,
};
