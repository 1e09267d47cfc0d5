use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::json;

use crate::aspect::{Aspect, Snapshot};
use crate::error::Result;

// Fixed Buckets in Microseconds (µs)
// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
pub const BUCKETS_MICROS: [u64; 9] = [
    100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000,
];

const SLOTS: usize = BUCKETS_MICROS.len() + 1;

/// Latency histogram with cumulative microsecond buckets.
///
/// Each observation lands in exactly one slot (the last slot is overflow
/// above 1s). `snapshot` reads every slot once and derives the cumulative
/// buckets, `+Inf` and `count` from that single pass, so one snapshot is
/// monotonic and `count` always equals `+Inf`. `sum_micros` is read
/// separately and may trail or lead the buckets by in-flight observations.
#[derive(Debug)]
pub struct HistogramAspect {
    name: String,
    in_root: bool,
    sum: AtomicU64,
    slots: [AtomicU64; SLOTS],
}

impl HistogramAspect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_root: false,
            sum: AtomicU64::new(0),
            slots: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    pub fn root(name: impl Into<String>) -> Self {
        Self {
            in_root: true,
            ..Self::new(name)
        }
    }

    /// Observe a duration (microsecond scale).
    pub fn observe(&self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        let slot = BUCKETS_MICROS
            .iter()
            .position(|&b| micros <= b)
            .unwrap_or(BUCKETS_MICROS.len());

        self.slots[slot].fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.slots.iter().map(|s| s.load(Ordering::Relaxed)).sum()
    }
}

impl Aspect for HistogramAspect {
    fn name(&self) -> &str {
        &self.name
    }

    fn in_root(&self) -> bool {
        self.in_root
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let counts: [u64; SLOTS] = std::array::from_fn(|i| self.slots[i].load(Ordering::Relaxed));

        let mut buckets = serde_json::Map::with_capacity(SLOTS);
        let mut cumulative = 0u64;
        for (le, n) in BUCKETS_MICROS.iter().zip(counts.iter()) {
            cumulative += n;
            buckets.insert(le.to_string(), Snapshot::from(cumulative));
        }
        let count = cumulative + counts[BUCKETS_MICROS.len()];
        buckets.insert("+Inf".into(), Snapshot::from(count));

        Ok(json!({
            "count": count,
            "sum_micros": self.sum.load(Ordering::Relaxed),
            "buckets": buckets,
        }))
    }
}
