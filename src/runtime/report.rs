//! Rendering of runtime diagnostics into log lines.

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

use super::{BuildInfo, GcStats, MemStats, RuntimeProbe};
use crate::telemetry::DebugLevel;

/// Diagnostic category of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Stack,
    Mem,
    Gc,
    Build,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Stack => "stack",
            Category::Mem => "mem",
            Category::Gc => "gc",
            Category::Build => "build",
        }
    }
}

/// One rendered diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: Category,
    pub message: String,
}

impl Diagnostic {
    fn new(category: Category, message: String) -> Self {
        Self { category, message }
    }
}

/// Runtime state read for one debug entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub memory: MemStats,
    pub collections: GcStats,
    pub build: Option<BuildInfo>,
    pub stack: Option<String>,
}

impl Snapshot {
    /// Read memory, collection and build figures from `probe`. The stack
    /// is captured only when `with_stack` is set.
    ///
    /// The memory `num_gc` is taken from the collection figures read here,
    /// so both sections of one entry agree.
    pub fn capture(probe: &dyn RuntimeProbe, with_stack: bool) -> Self {
        let collections = probe.collections();
        let memory = MemStats {
            num_gc: collections.num_gc,
            ..probe.memory()
        };

        Self {
            memory,
            collections,
            build: probe.build_info(),
            stack: with_stack.then(|| probe.stack_trace()),
        }
    }

    /// Render the sections selected by `level`, in the order stack,
    /// memory, collections, build.
    pub fn render(&self, level: &DebugLevel) -> Vec<Diagnostic> {
        let mut lines = Vec::new();

        if level.includes_stack() {
            if let Some(stack) = &self.stack {
                lines.push(Diagnostic::new(
                    Category::Stack,
                    format!("Stack Trace:\n{stack}"),
                ));
            }
        }

        if level.includes_mem() {
            let m = &self.memory;
            let mem = [
                format!("Alloc: {} bytes", m.alloc),
                format!("TotalAlloc: {} bytes", m.total_alloc),
                format!("HeapAlloc: {} bytes", m.heap_alloc),
                format!("HeapSys: {} bytes", m.heap_sys),
                format!("HeapIdle: {} bytes", m.heap_idle),
                format!("HeapInuse: {} bytes", m.heap_inuse),
                format!("HeapReleased: {} bytes", m.heap_released),
                format!("HeapObjects: {}", m.heap_objects),
                format!("StackInUse: {} bytes", m.stack_inuse),
                format!("StackSys: {} bytes", m.stack_sys),
                format!("NumGC: {}", m.num_gc),
            ];
            lines.extend(mem.into_iter().map(|line| Diagnostic::new(Category::Mem, line)));
        }

        if level.includes_gc() {
            let gc = &self.collections;
            let last_gc = gc
                .last_gc
                .map_or_else(|| "never".to_string(), |at| timestamp(&at));
            let stats = [
                format!("LastGC: {last_gc}"),
                format!("NumGC: {}", gc.num_gc),
                format!("PauseTotal: {:?}", gc.pause_total),
                format!("Pause: {}", durations(&gc.pause)),
                format!("PauseEnd: {}", timestamps(&gc.pause_end)),
                format!("PauseQuantiles: {}", durations(&gc.pause_quantiles)),
            ];
            lines.extend(stats.into_iter().map(|line| Diagnostic::new(Category::Gc, line)));
        }

        if level.includes_build() {
            if let Some(build) = &self.build {
                lines.push(Diagnostic::new(Category::Build, format!("Build Info: {build}")));
            }
        }

        lines
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn durations(values: &[Duration]) -> String {
    format!("{values:?}")
}

fn timestamps(values: &[DateTime<Utc>]) -> String {
    let rendered: Vec<String> = values.iter().map(timestamp).collect();
    format!("[{}]", rendered.join(", "))
}
