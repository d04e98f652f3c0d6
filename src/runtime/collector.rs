//! Collection-cycle statistics.
//!
//! Rust has no tracing garbage collector, so the "GC" figures reported by
//! debug entries come from reclamation work the application reports
//! itself: cache sweeps, arena resets, epoch reclamation and the like.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Number of recent pauses kept for [`GcStats::pause`].
pub const PAUSE_HISTORY: usize = 256;

/// Process-wide recorder used by the default runtime probe.
pub static GLOBAL_COLLECTIONS: Lazy<CollectionRecorder> = Lazy::new(CollectionRecorder::new);

/// Records collection pauses.
pub struct CollectionRecorder {
    inner: Mutex<RecorderState>,
}

#[derive(Default)]
struct RecorderState {
    num_gc: u64,
    pause_total: Duration,
    last_gc: Option<DateTime<Utc>>,
    // Oldest first; newest at the back.
    recent: VecDeque<Pause>,
}

#[derive(Debug, Clone, Copy)]
struct Pause {
    duration: Duration,
    end: DateTime<Utc>,
}

impl CollectionRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RecorderState::default()),
        }
    }

    /// Record a pause that ended now.
    pub fn record(&self, pause: Duration) {
        self.record_at(Utc::now(), pause);
    }

    /// Record a pause that ended at `end`.
    pub fn record_at(&self, end: DateTime<Utc>, pause: Duration) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.num_gc += 1;
        state.pause_total += pause;
        state.last_gc = Some(state.last_gc.map_or(end, |last| last.max(end)));
        if state.recent.len() == PAUSE_HISTORY {
            state.recent.pop_front();
        }
        state.recent.push_back(Pause {
            duration: pause,
            end,
        });
    }

    /// Run `f` and record its duration as one pause.
    pub fn measure<T>(&self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.record(start.elapsed());
        result
    }

    /// Number of collections recorded so far.
    pub fn num_gc(&self) -> u64 {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).num_gc
    }

    /// Get a snapshot of the recorded statistics.
    pub fn snapshot(&self) -> GcStats {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let pause: Vec<Duration> = state.recent.iter().rev().map(|p| p.duration).collect();
        let pause_end = state.recent.iter().rev().map(|p| p.end).collect();

        GcStats {
            last_gc: state.last_gc,
            num_gc: state.num_gc,
            pause_total: state.pause_total,
            pause_quantiles: quantiles(&pause),
            pause,
            pause_end,
        }
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = RecorderState::default();
    }
}

impl Default for CollectionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of collection statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcStats {
    /// End of the most recent collection, `None` if there has been none.
    pub last_gc: Option<DateTime<Utc>>,
    /// Number of collections recorded.
    pub num_gc: u64,
    /// Sum of all pause durations.
    pub pause_total: Duration,
    /// Recent pauses, newest first.
    pub pause: Vec<Duration>,
    /// End times of the recent pauses, newest first.
    pub pause_end: Vec<DateTime<Utc>>,
    /// Minimum, 25th, 50th, 75th percentile and maximum of the recent
    /// pauses. Empty when nothing was recorded.
    pub pause_quantiles: Vec<Duration>,
}

fn quantiles(samples: &[Duration]) -> Vec<Duration> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut sorted = samples.to_vec();
    sorted.sort();

    [0u8, 25, 50, 75, 100]
        .iter()
        .map(|&p| {
            let index = (p as f64 / 100.0 * (sorted.len() - 1) as f64).round() as usize;
            sorted[index.min(sorted.len() - 1)]
        })
        .collect()
}
