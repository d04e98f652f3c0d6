//! The logging facade.

use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use tracing::Dispatch;

use super::config::Severity;
use super::debug::DebugOptions;
use super::fields::Fields;
use crate::error::DomainError;
use crate::runtime::{RuntimeProbe, Snapshot};

/// Target of every event the facade emits.
pub const TARGET: &str = "tradelog";

/// Field naming the category of a diagnostic entry.
pub const DIAGNOSTIC_KEY: &str = "diagnostic";

/// Structured JSON logger bound to an application and module name.
///
/// Build one at startup (see [`init_logger`](crate::init_logger)) and
/// share it by cloning or behind an `Arc`. Every entry point is
/// `#[track_caller]`, so the `source` of an entry is the line that called
/// the logger, not a line inside this crate.
#[derive(Clone)]
pub struct Logger {
    pub(crate) name: Arc<str>,
    pub(crate) module: Arc<str>,
    pub(crate) severity: Severity,
    pub(crate) dispatch: Dispatch,
    pub(crate) probe: Arc<dyn RuntimeProbe>,
}

#[derive(Clone, Copy)]
enum Entry {
    Error,
    Info,
    Verbose,
}

impl Logger {
    /// Application name written as `logger` on every entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module name written as `module` on every entry.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Configured minimum severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Log a message at informational severity.
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &Fields) {
        self.emit(Entry::Info, msg, fields, None, Location::caller());
    }

    /// Log a message at debug severity. Written only when the logger was
    /// configured with [`Severity::Debug`].
    #[track_caller]
    pub fn verbose(&self, msg: &str, fields: &Fields) {
        self.emit(Entry::Verbose, msg, fields, None, Location::caller());
    }

    /// Log a domain error at error severity.
    ///
    /// The message reads `Error: <message>, ErrorCode: <code>, Details:
    /// <details>`; the wrapped cause, when there is one, becomes the
    /// entry's `error`.
    #[track_caller]
    pub fn error<E>(&self, err: &E, fields: &Fields)
    where
        E: DomainError + ?Sized,
    {
        let message = format!(
            "Error: {}, ErrorCode: {}, Details: {}",
            err,
            err.error_code(),
            err.details()
        );
        self.emit(
            Entry::Error,
            &message,
            fields,
            err.original_error(),
            Location::caller(),
        );
    }

    /// Log a message at informational severity, followed by the runtime
    /// diagnostics `options` select.
    ///
    /// The base message is always written once. With diagnostics enabled,
    /// an unrecognized level is reported as an error entry and no sections
    /// are written; otherwise each selected section follows as its own
    /// entries, tagged with a `diagnostic` field.
    #[track_caller]
    pub fn debug(&self, msg: &str, options: &DebugOptions, fields: &Fields) {
        let location = Location::caller();
        self.emit(Entry::Info, msg, fields, None, location);

        if !options.enabled {
            return;
        }

        if !options.level.is_valid() {
            let report = format!("Invalid debug option: {}", options.level);
            self.emit(Entry::Error, &report, &Fields::new(), None, location);
        }

        let snapshot = Snapshot::capture(self.probe.as_ref(), options.level.includes_stack());
        for diagnostic in snapshot.render(&options.level) {
            let fields = Fields::trusted(DIAGNOSTIC_KEY, diagnostic.category.as_str());
            self.emit(Entry::Info, &diagnostic.message, &fields, None, location);
        }
    }

    fn emit(
        &self,
        entry: Entry,
        message: &str,
        fields: &Fields,
        cause: Option<&(dyn StdError + 'static)>,
        location: &'static Location<'static>,
    ) {
        let error = cause.map(tracing::field::display);

        tracing::dispatcher::with_default(&self.dispatch, || {
            macro_rules! event_at {
                ($level:expr) => {
                    tracing::event!(
                        target: TARGET,
                        $level,
                        caller.file = location.file(),
                        caller.line = location.line(),
                        error = error,
                        fields = %fields,
                        "{}",
                        message
                    )
                };
            }

            match entry {
                Entry::Error => event_at!(tracing::Level::ERROR),
                Entry::Info => event_at!(tracing::Level::INFO),
                Entry::Verbose => event_at!(tracing::Level::DEBUG),
            }
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}
