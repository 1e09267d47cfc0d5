use std::sync::atomic::{AtomicI64, Ordering};

use crate::aspect::{Aspect, Snapshot};
use crate::error::Result;

/// Signed gauge (e.g. in-flight requests).
#[derive(Debug)]
pub struct GaugeAspect {
    name: String,
    in_root: bool,
    value: AtomicI64,
}

impl GaugeAspect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_root: false,
            value: AtomicI64::new(0),
        }
    }

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

    /// Decrement by 1.
    pub fn dec(&self) {
        self.add(-1);
    }

    /// Add an arbitrary signed delta.
    pub fn add(&self, v: i64) {
        self.value.fetch_add(v, Ordering::Relaxed);
    }

    pub fn set(&self, v: i64) {
        self.value.store(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Aspect for GaugeAspect {
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
