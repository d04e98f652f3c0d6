//! Runtime introspection for debug entries.
//!
//! - Memory statistics from the tracking allocator and the OS
//! - Collection statistics reported by the application
//! - Build metadata captured at compile time
//! - Stack traces
//!
//! [`RuntimeProbe`] is the seam the logger reads through; tests swap in
//! probes that return fixed values.

pub mod build_info;
pub mod collector;
pub mod memory;
pub mod report;

pub use build_info::BuildInfo;
pub use collector::{CollectionRecorder, GcStats, GLOBAL_COLLECTIONS, PAUSE_HISTORY};
pub use memory::{AllocationCounters, MemStats, ProcessMemory, TrackingAllocator};
pub use report::{Category, Diagnostic, Snapshot};

use std::backtrace::Backtrace;
use std::sync::Arc;

/// Source of runtime statistics.
pub trait RuntimeProbe: Send + Sync {
    /// Current memory statistics.
    fn memory(&self) -> MemStats;

    /// Current collection statistics.
    fn collections(&self) -> GcStats;

    /// Build metadata, `None` when unavailable.
    fn build_info(&self) -> Option<BuildInfo>;

    /// Stack trace of the calling thread.
    fn stack_trace(&self) -> String;
}

/// Probe over the live process.
#[derive(Clone)]
pub struct ProcessProbe {
    recorder: Option<Arc<CollectionRecorder>>,
    build: Option<BuildInfo>,
}

impl ProcessProbe {
    /// Probe backed by [`GLOBAL_COLLECTIONS`].
    ///
    /// The reported build info is [`BuildInfo::compiled`], which describes
    /// `tradelog` itself rather than the application. To report the
    /// application's package, pass the result of
    /// [`build_info!`](crate::build_info) from the binary:
    ///
    /// ```rust
    /// use tradelog::ProcessProbe;
    ///
    /// let probe = ProcessProbe::new().with_build_info(Some(tradelog::build_info!()));
    /// ```
    pub fn new() -> Self {
        Self {
            recorder: None,
            build: Some(BuildInfo::compiled()),
        }
    }

    /// Read collection statistics from `recorder` instead of the global one.
    pub fn with_recorder(mut self, recorder: Arc<CollectionRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Replace the reported build info; `None` reports it as unavailable.
    pub fn with_build_info(mut self, build: Option<BuildInfo>) -> Self {
        self.build = build;
        self
    }

    fn recorder(&self) -> &CollectionRecorder {
        match &self.recorder {
            Some(recorder) => recorder,
            None => &GLOBAL_COLLECTIONS,
        }
    }
}

impl Default for ProcessProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeProbe for ProcessProbe {
    fn memory(&self) -> MemStats {
        MemStats::read(self.recorder().num_gc())
    }

    fn collections(&self) -> GcStats {
        self.recorder().snapshot()
    }

    fn build_info(&self) -> Option<BuildInfo> {
        self.build.clone()
    }

    fn stack_trace(&self) -> String {
        Backtrace::force_capture().to_string()
    }
}
