use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::aspect::{Aspect, Snapshot};
use crate::error::Result;

/// Counter family keyed by one label value (e.g. request path).
///
/// Snapshot is a JSON object `{label: count}`; keys are emitted sorted so the
/// output is deterministic regardless of shard iteration order.
#[derive(Debug, Default)]
pub struct LabeledCounterAspect {
    name: String,
    in_root: bool,
    map: DashMap<String, AtomicU64>,
}

impl LabeledCounterAspect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_root: false,
            map: DashMap::new(),
        }
    }

    pub fn root(name: impl Into<String>) -> Self {
        Self {
            in_root: true,
            ..Self::new(name)
        }
    }

    /// Increment by 1.
    pub fn inc(&self, label: &str) {
        self.add(label, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, label: &str, v: u64) {
        // Hot path: existing label, shared shard lock only.
        if let Some(counter) = self.map.get(label) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self
            .map
            .entry(label.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, label: &str) -> u64 {
        self.map
            .get(label)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}

impl Aspect for LabeledCounterAspect {
    fn name(&self) -> &str {
        &self.name
    }

    fn in_root(&self) -> bool {
        self.in_root
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let mut entries: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        entries.sort();

        let obj: serde_json::Map<String, Snapshot> = entries
            .into_iter()
            .map(|(k, v)| (k, Snapshot::from(v)))
            .collect();
        Ok(Snapshot::Object(obj))
    }
}
