//! Assertion helpers for captured log entries.

use serde_json::Value;

/// Messages of the captured entries, in order.
pub fn messages(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry["msg"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Number of entries tagged with the given diagnostic category.
pub fn count_diagnostic(entries: &[Value], category: &str) -> usize {
    entries
        .iter()
        .filter(|entry| entry["diagnostic"] == category)
        .count()
}

/// Number of entries at the given level.
pub fn count_level(entries: &[Value], level: &str) -> usize {
    entries.iter().filter(|entry| entry["level"] == level).count()
}

/// Assert that an entry carries the bound logger and module names.
pub fn assert_bound(entry: &Value, logger: &str, module: &str) {
    assert_eq!(
        entry["logger"], logger,
        "Expected logger '{}' on entry {}",
        logger, entry
    );
    assert_eq!(
        entry["module"], module,
        "Expected module '{}' on entry {}",
        module, entry
    );
}

/// Assert that an entry is attributed to `line` of a file ending in `file`.
pub fn assert_source(entry: &Value, file: &str, line: u32) {
    let source = &entry["source"];
    assert!(
        source["file"].as_str().unwrap_or_default().ends_with(file),
        "Expected source file ending in '{}', got {}",
        file,
        source
    );
    assert_eq!(
        source["line"],
        u64::from(line),
        "Expected source line {} on entry {}",
        line,
        entry
    );
}
