//! Memory statistics.
//!
//! Allocation figures come from [`TrackingAllocator`], which only counts
//! when the application installs it as the global allocator:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static ALLOC: tradelog::TrackingAllocator = tradelog::TrackingAllocator::system();
//! ```
//!
//! Process figures come from `/proc/self/status` on Linux and are zero on
//! other platforms.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
static TOTAL_BYTES: AtomicU64 = AtomicU64::new(0);
static RETURNED_BYTES: AtomicU64 = AtomicU64::new(0);
static LIVE_OBJECTS: AtomicU64 = AtomicU64::new(0);

/// Global allocator wrapper that counts allocations.
///
/// Counting uses relaxed atomics and never allocates.
pub struct TrackingAllocator<A = System> {
    inner: A,
}

impl TrackingAllocator<System> {
    /// Wrap the system allocator.
    pub const fn system() -> Self {
        Self { inner: System }
    }
}

impl<A> TrackingAllocator<A> {
    /// Wrap an arbitrary allocator.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

fn on_alloc(size: usize) {
    LIVE_BYTES.fetch_add(size as u64, Ordering::Relaxed);
    TOTAL_BYTES.fetch_add(size as u64, Ordering::Relaxed);
    LIVE_OBJECTS.fetch_add(1, Ordering::Relaxed);
}

fn on_dealloc(size: usize) {
    LIVE_BYTES.fetch_sub(size as u64, Ordering::Relaxed);
    RETURNED_BYTES.fetch_add(size as u64, Ordering::Relaxed);
    LIVE_OBJECTS.fetch_sub(1, Ordering::Relaxed);
}

// SAFETY: every call is forwarded unchanged to the wrapped allocator; the
// counters are updated only after a successful allocation.
unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        on_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = self.inner.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            let old_size = layout.size() as u64;
            let new_size = new_size as u64;
            TOTAL_BYTES.fetch_add(new_size, Ordering::Relaxed);
            RETURNED_BYTES.fetch_add(old_size, Ordering::Relaxed);
            if new_size >= old_size {
                LIVE_BYTES.fetch_add(new_size - old_size, Ordering::Relaxed);
            } else {
                LIVE_BYTES.fetch_sub(old_size - new_size, Ordering::Relaxed);
            }
        }
        new_ptr
    }
}

/// Counters maintained by [`TrackingAllocator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationCounters {
    /// Bytes in live allocations.
    pub live_bytes: u64,
    /// Bytes allocated over the process lifetime.
    pub total_bytes: u64,
    /// Bytes handed back to the allocator over the process lifetime.
    pub returned_bytes: u64,
    /// Number of live allocations.
    pub live_objects: u64,
}

impl AllocationCounters {
    /// Read the current counters. All zero unless the tracking allocator
    /// is installed.
    pub fn read() -> Self {
        Self {
            live_bytes: LIVE_BYTES.load(Ordering::Relaxed),
            total_bytes: TOTAL_BYTES.load(Ordering::Relaxed),
            returned_bytes: RETURNED_BYTES.load(Ordering::Relaxed),
            live_objects: LIVE_OBJECTS.load(Ordering::Relaxed),
        }
    }
}

/// Process memory figures reported by the operating system, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessMemory {
    /// Size of the data segment (`VmData`).
    pub data: u64,
    /// Resident set size (`VmRSS`).
    pub resident: u64,
    /// Main thread stack size (`VmStk`).
    pub stack: u64,
}

impl ProcessMemory {
    /// Read the figures for the current process.
    #[cfg(target_os = "linux")]
    pub fn read() -> Self {
        std::fs::read_to_string("/proc/self/status")
            .map(|status| Self::parse(&status))
            .unwrap_or_default()
    }

    /// Read the figures for the current process.
    #[cfg(not(target_os = "linux"))]
    pub fn read() -> Self {
        Self::default()
    }

    /// Parse the contents of a `/proc/<pid>/status` file.
    pub fn parse(status: &str) -> Self {
        let mut memory = Self::default();
        for line in status.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let slot = match key.trim() {
                "VmData" => &mut memory.data,
                "VmRSS" => &mut memory.resident,
                "VmStk" => &mut memory.stack,
                _ => continue,
            };
            *slot = parse_kib(value).unwrap_or(0);
        }
        memory
    }
}

fn parse_kib(value: &str) -> Option<u64> {
    let mut parts = value.split_whitespace();
    let amount: u64 = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(unit) if unit.eq_ignore_ascii_case("kb") => amount.checked_mul(1024),
        Some(_) => None,
        None => Some(amount),
    }
}

/// Memory statistics reported by debug entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemStats {
    pub alloc: u64,
    pub total_alloc: u64,
    pub heap_alloc: u64,
    pub heap_sys: u64,
    pub heap_idle: u64,
    pub heap_inuse: u64,
    pub heap_released: u64,
    pub heap_objects: u64,
    pub stack_inuse: u64,
    pub stack_sys: u64,
    pub num_gc: u64,
}

impl MemStats {
    /// Combine allocator counters, process figures and the collection count.
    pub fn from_parts(counters: AllocationCounters, process: ProcessMemory, num_gc: u64) -> Self {
        Self {
            alloc: counters.live_bytes,
            total_alloc: counters.total_bytes,
            heap_alloc: counters.live_bytes,
            heap_sys: process.data,
            heap_idle: process.data.saturating_sub(process.resident),
            heap_inuse: process.resident,
            heap_released: counters.returned_bytes,
            heap_objects: counters.live_objects,
            stack_inuse: process.stack,
            stack_sys: process.stack,
            num_gc,
        }
    }

    /// Read current statistics.
    pub fn read(num_gc: u64) -> Self {
        Self::from_parts(AllocationCounters::read(), ProcessMemory::read(), num_gc)
    }
}
