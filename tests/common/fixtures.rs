//! Test fixtures: a capturing writer and a runtime probe with fixed values.
//!
//! Loggers built here write into memory and report deterministic runtime
//! statistics, so tests can assert on exact entries.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

use tradelog::runtime::{BuildInfo, GcStats, MemStats, RuntimeProbe};
use tradelog::{Logger, LoggerConfig, Severity};

/// In-memory sink that collects JSON lines.
#[derive(Clone, Default)]
pub struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw captured output.
    pub fn output(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).to_string()
    }

    /// Every captured line parsed as JSON.
    pub fn entries(&self) -> Vec<Value> {
        self.output()
            .lines()
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("line is not JSON ({e}): {line}"))
            })
            .collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("Mutex poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Probe returning fixed statistics.
#[derive(Clone)]
pub struct FixedProbe {
    pub memory: MemStats,
    pub collections: GcStats,
    pub build: Option<BuildInfo>,
}

impl Default for FixedProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedProbe {
    pub fn new() -> Self {
        let end = Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap();
        Self {
            memory: MemStats {
                alloc: 2048,
                total_alloc: 8192,
                heap_alloc: 2048,
                heap_sys: 65536,
                heap_idle: 32768,
                heap_inuse: 32768,
                heap_released: 6144,
                heap_objects: 12,
                stack_inuse: 4096,
                stack_sys: 4096,
                num_gc: 2,
            },
            collections: GcStats {
                last_gc: Some(end),
                num_gc: 2,
                pause_total: Duration::from_millis(9),
                pause: vec![Duration::from_millis(5), Duration::from_millis(4)],
                pause_end: vec![end, end],
                pause_quantiles: vec![
                    Duration::from_millis(4),
                    Duration::from_millis(4),
                    Duration::from_millis(5),
                    Duration::from_millis(5),
                    Duration::from_millis(5),
                ],
            },
            build: Some(BuildInfo::for_package("orders", "2.1.0").with_commit("0123abcd")),
        }
    }

    pub fn without_build(mut self) -> Self {
        self.build = None;
        self
    }
}

impl RuntimeProbe for FixedProbe {
    fn memory(&self) -> MemStats {
        self.memory
    }

    fn collections(&self) -> GcStats {
        self.collections.clone()
    }

    fn build_info(&self) -> Option<BuildInfo> {
        self.build.clone()
    }

    fn stack_trace(&self) -> String {
        "0: orders::engine::rebuild\n1: main".to_string()
    }
}

/// [`FixedProbe`] that counts how often each statistic is read.
#[derive(Clone, Default)]
pub struct CountingProbe {
    inner: FixedProbe,
    memory_reads: Arc<AtomicUsize>,
    collection_reads: Arc<AtomicUsize>,
    stack_reads: Arc<AtomicUsize>,
}

impl CountingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory_reads(&self) -> usize {
        self.memory_reads.load(Ordering::SeqCst)
    }

    pub fn collection_reads(&self) -> usize {
        self.collection_reads.load(Ordering::SeqCst)
    }

    pub fn stack_reads(&self) -> usize {
        self.stack_reads.load(Ordering::SeqCst)
    }
}

impl RuntimeProbe for CountingProbe {
    fn memory(&self) -> MemStats {
        self.memory_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.memory()
    }

    fn collections(&self) -> GcStats {
        self.collection_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.collections()
    }

    fn build_info(&self) -> Option<BuildInfo> {
        self.inner.build_info()
    }

    fn stack_trace(&self) -> String {
        self.stack_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.stack_trace()
    }
}

/// Logger named `orders`/`matching` at the given severity string, writing
/// into a [`Capture`] and reading a [`FixedProbe`].
pub fn logger(log_level: &str) -> (Logger, Capture) {
    let config =
        LoggerConfig::new("orders", "matching").with_level(Severity::from_name(log_level));
    logger_with(&config, FixedProbe::new())
}

/// Logger for an arbitrary config and probe.
pub fn logger_with<P>(config: &LoggerConfig, probe: P) -> (Logger, Capture)
where
    P: RuntimeProbe + 'static,
{
    let capture = Capture::new();
    let logger = Logger::with_writer(config, capture.clone()).with_probe(Arc::new(probe));
    (logger, capture)
}
