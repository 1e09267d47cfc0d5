use std::sync::atomic::{AtomicU64, Ordering};

use crate::aspect::{Aspect, Snapshot};
use crate::error::Result;

/// Monotonic counter. Snapshot is a plain integer.
#[derive(Debug)]
pub struct CounterAspect {
    name: String,
    in_root: bool,
    value: AtomicU64,
}

impl CounterAspect {
    /// Counter served at `/<name>`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_root: false,
            value: AtomicU64::new(0),
        }
    }

    /// Counter merged into the root document.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            in_root: true,
            ..Self::new(name)
        }
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, v: u64) {
        self.value.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Aspect for CounterAspect {
    fn name(&self) -> &str {
        &self.name
    }

    fn in_root(&self) -> bool {
        self.in_root
    }

    fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot::from(self.get()))
    }
}
