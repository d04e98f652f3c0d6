//! Integration tests for debug entries and runtime diagnostics.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::assertions::{assert_source, count_diagnostic, count_level, messages};
use common::fixtures::{logger, logger_with, Capture, CountingProbe, FixedProbe};
use tradelog::runtime::ProcessProbe;
use tradelog::{
    fields, CollectionRecorder, DebugLevel, DebugOptions, Fields, Logger, LoggerConfig,
};

const MEM_LINES: [&str; 11] = [
    "Alloc: 2048 bytes",
    "TotalAlloc: 8192 bytes",
    "HeapAlloc: 2048 bytes",
    "HeapSys: 65536 bytes",
    "HeapIdle: 32768 bytes",
    "HeapInuse: 32768 bytes",
    "HeapReleased: 6144 bytes",
    "HeapObjects: 12",
    "StackInUse: 4096 bytes",
    "StackSys: 4096 bytes",
    "NumGC: 2",
];

const GC_LINES: [&str; 6] = [
    "LastGC: 2026-05-04T09:30:00.000000Z",
    "NumGC: 2",
    "PauseTotal: 9ms",
    "Pause: [5ms, 4ms]",
    "PauseEnd: [2026-05-04T09:30:00.000000Z, 2026-05-04T09:30:00.000000Z]",
    "PauseQuantiles: [4ms, 4ms, 5ms, 5ms, 5ms]",
];

fn base_count(entries: &[serde_json::Value], msg: &str) -> usize {
    entries.iter().filter(|e| e["msg"] == msg).count()
}

// ── Disabled ──────────────────────────────────────────────────────

#[test]
fn test_disabled_writes_only_the_base_message() {
    let (logger, capture) = logger("INFO");
    let fields = fields!["book" => "ETH-USD"].unwrap();

    let options = DebugOptions {
        enabled: false,
        level: DebugLevel::Mem,
    };

    logger.debug("book rebuilt", &options, &fields);

    let entries = capture.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["msg"], "book rebuilt");
    assert_eq!(entries[0]["level"], "INFO");
    assert_eq!(entries[0]["book"], "ETH-USD");
}

// ── Single categories ─────────────────────────────────────────────

#[test]
fn test_gc_writes_six_collection_entries() {
    let (logger, capture) = logger("INFO");

    logger.debug("sweep", &DebugOptions::enabled(DebugLevel::Gc), &Fields::new());

    let entries = capture.entries();
    assert_eq!(base_count(&entries, "sweep"), 1);
    assert_eq!(count_diagnostic(&entries, "gc"), 6);
    assert_eq!(count_diagnostic(&entries, "mem"), 0);
    assert_eq!(count_diagnostic(&entries, "stack"), 0);
    assert_eq!(count_diagnostic(&entries, "build"), 0);
    assert_eq!(messages(&entries[1..]), GC_LINES);
}

#[test]
fn test_mem_writes_eleven_memory_entries() {
    let (logger, capture) = logger("INFO");

    logger.debug("alloc check", &DebugOptions::enabled("MEM"), &Fields::new());

    let entries = capture.entries();
    assert_eq!(entries.len(), 12);
    assert_eq!(messages(&entries[1..]), MEM_LINES);
    assert!(entries[1..].iter().all(|e| e["level"] == "INFO"));
}

#[test]
fn test_stack_writes_one_trace_entry() {
    let (logger, capture) = logger("INFO");

    logger.debug("where", &DebugOptions::enabled(DebugLevel::Stack), &Fields::new());

    let entries = capture.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["diagnostic"], "stack");
    assert_eq!(
        entries[1]["msg"],
        "Stack Trace:\n0: orders::engine::rebuild\n1: main"
    );
}

#[test]
fn test_build_writes_build_info() {
    let (logger, capture) = logger("INFO");

    logger.debug("version", &DebugOptions::enabled(DebugLevel::Build), &Fields::new());

    let entries = capture.entries();
    assert_eq!(entries.len(), 2);
    let msg = entries[1]["msg"].as_str().unwrap();
    assert!(msg.starts_with("Build Info: package\torders\nversion\t2.1.0"));
    assert!(msg.ends_with("commit\t0123abcd"));
}

#[test]
fn test_build_skipped_when_unavailable() {
    let config = LoggerConfig::new("orders", "matching");
    let (logger, capture) = logger_with(&config, FixedProbe::new().without_build());

    logger.debug("version", &DebugOptions::enabled(DebugLevel::Build), &Fields::new());

    let entries = capture.entries();
    assert_eq!(messages(&entries), vec!["version"]);
    assert_eq!(count_level(&entries, "ERROR"), 0);
}

#[test]
fn test_info_level_writes_no_sections() {
    let (logger, capture) = logger("INFO");

    logger.debug("plain", &DebugOptions::enabled(DebugLevel::Info), &Fields::new());

    assert_eq!(messages(&capture.entries()), vec!["plain"]);
}

// ── Invalid level ─────────────────────────────────────────────────

#[test]
fn test_invalid_level_is_reported_not_fatal() {
    let (logger, capture) = logger("INFO");

    logger.debug("odd", &DebugOptions::enabled("BOGUS"), &Fields::new());

    let entries = capture.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["msg"], "odd");
    assert_eq!(entries[1]["level"], "ERROR");
    assert_eq!(entries[1]["msg"], "Invalid debug option: BOGUS");
    for category in ["stack", "mem", "gc", "build"] {
        assert_eq!(count_diagnostic(&entries, category), 0);
    }
}

// ── All ───────────────────────────────────────────────────────────

#[test]
fn test_all_writes_every_section_once() {
    let (logger, capture) = logger("INFO");

    logger.debug("full dump", &DebugOptions::enabled(DebugLevel::All), &Fields::new());

    let entries = capture.entries();
    assert_eq!(entries.len(), 1 + 1 + 11 + 6 + 1);
    assert_eq!(base_count(&entries, "full dump"), 1);
    assert_eq!(count_diagnostic(&entries, "stack"), 1);
    assert_eq!(count_diagnostic(&entries, "mem"), 11);
    assert_eq!(count_diagnostic(&entries, "gc"), 6);
    assert_eq!(count_diagnostic(&entries, "build"), 1);

    let order: Vec<&str> = entries[1..]
        .iter()
        .map(|e| e["diagnostic"].as_str().unwrap())
        .collect();
    let mut expected = vec!["stack"];
    expected.extend(["mem"; 11]);
    expected.extend(["gc"; 6]);
    expected.push("build");
    assert_eq!(order, expected);
}

#[test]
fn test_all_without_build_info() {
    let config = LoggerConfig::new("orders", "matching");
    let (logger, capture) = logger_with(&config, FixedProbe::new().without_build());

    logger.debug("full dump", &DebugOptions::enabled(DebugLevel::All), &Fields::new());

    let entries = capture.entries();
    assert_eq!(entries.len(), 1 + 1 + 11 + 6);
    assert_eq!(count_diagnostic(&entries, "build"), 0);
}

// ── Attribution and fields ────────────────────────────────────────

#[test]
fn test_every_entry_is_attributed_to_the_caller() {
    let (logger, capture) = logger("INFO");

    logger.debug("traced", &DebugOptions::enabled("ALL"), &Fields::new());
    let line = line!() - 1;

    for entry in capture.entries() {
        assert_source(&entry, "test_debug.rs", line);
    }
}

#[test]
fn test_fields_only_on_base_message() {
    let (logger, capture) = logger("INFO");
    let fields = fields!["book" => "SOL-USD"].unwrap();

    logger.debug("rebuild", &DebugOptions::enabled(DebugLevel::Gc), &fields);

    let entries = capture.entries();
    assert_eq!(entries[0]["book"], "SOL-USD");
    assert!(entries[1..].iter().all(|e| e.get("book").is_none()));
}

#[test]
fn test_debug_entries_visible_at_info_floor() {
    let (logger, capture) = logger("PRODUCTION");

    logger.debug("still shown", &DebugOptions::enabled(DebugLevel::Mem), &Fields::new());

    assert_eq!(capture.entries().len(), 12);
}

// ── Live process probe ────────────────────────────────────────────

// ── Statistics reads ──────────────────────────────────────────────

fn debug_with_counting_probe(options: &DebugOptions) -> (CountingProbe, usize) {
    let probe = CountingProbe::new();
    let config = LoggerConfig::new("orders", "matching");
    let (logger, capture) = logger_with(&config, probe.clone());

    logger.debug("checkpoint", options, &Fields::new());
    (probe, capture.entries().len())
}

#[test]
fn test_invalid_level_still_reads_statistics() {
    let (probe, entries) = debug_with_counting_probe(&DebugOptions::enabled("BOGUS"));
    assert_eq!(probe.memory_reads(), 1);
    assert_eq!(probe.collection_reads(), 1);
    assert_eq!(probe.stack_reads(), 0);
    assert_eq!(entries, 2);
}

#[test]
fn test_info_level_still_reads_statistics() {
    let (probe, entries) = debug_with_counting_probe(&DebugOptions::enabled(DebugLevel::Info));
    assert_eq!(probe.memory_reads(), 1);
    assert_eq!(probe.collection_reads(), 1);
    assert_eq!(probe.stack_reads(), 0);
    assert_eq!(entries, 1);
}

#[test]
fn test_disabled_reads_nothing() {
    let (probe, entries) = debug_with_counting_probe(&DebugOptions {
        enabled: false,
        level: DebugLevel::All,
    });
    assert_eq!(probe.memory_reads(), 0);
    assert_eq!(probe.collection_reads(), 0);
    assert_eq!(probe.stack_reads(), 0);
    assert_eq!(entries, 1);
}

#[test]
fn test_stack_read_only_when_wanted() {
    let (probe, _) = debug_with_counting_probe(&DebugOptions::enabled(DebugLevel::Mem));
    assert_eq!(probe.stack_reads(), 0);

    let (probe, _) = debug_with_counting_probe(&DebugOptions::enabled(DebugLevel::All));
    assert_eq!(probe.stack_reads(), 1);
    assert_eq!(probe.memory_reads(), 1);
    assert_eq!(probe.collection_reads(), 1);
}

#[test]
fn test_process_probe_reports_live_figures() {
    let recorder = Arc::new(CollectionRecorder::new());
    recorder.record(Duration::from_millis(3));
    recorder.record(Duration::from_millis(1));
    let probe = ProcessProbe::new()
        .with_recorder(recorder)
        .with_build_info(Some(tradelog::build_info!()));

    let capture = Capture::new();
    let config = LoggerConfig::new("orders", "matching");
    let logger = Logger::with_writer(&config, capture.clone()).with_probe(Arc::new(probe));

    logger.debug("live", &DebugOptions::enabled(DebugLevel::All), &Fields::new());

    let entries = capture.entries();
    assert_eq!(count_diagnostic(&entries, "stack"), 1);
    assert_eq!(count_diagnostic(&entries, "mem"), 11);
    assert_eq!(count_diagnostic(&entries, "gc"), 6);
    assert_eq!(count_diagnostic(&entries, "build"), 1);

    let all = messages(&entries);
    assert!(all.contains(&"NumGC: 2".to_string()));
    assert!(all.contains(&"Pause: [1ms, 3ms]".to_string()));
    assert!(all
        .iter()
        .any(|m| m.starts_with("Build Info: package\ttradelog")));
    assert!(all.iter().any(|m| m.starts_with("Stack Trace:\n")));
}
