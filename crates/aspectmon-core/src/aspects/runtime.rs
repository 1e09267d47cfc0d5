//! Process-level statistics, placed at the root document by default.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde_json::json;

use crate::aspect::{Aspect, Snapshot};
use crate::error::Result;

pub struct RuntimeAspect {
    started: Instant,
    started_at_unix: u64,
}

impl RuntimeAspect {
    pub const NAME: &'static str = "runtime";

    pub fn new() -> Self {
        let started_at_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            started: Instant::now(),
            started_at_unix,
        }
    }
}

impl Default for RuntimeAspect {
    fn default() -> Self {
        Self::new()
    }
}

impl Aspect for RuntimeAspect {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn in_root(&self) -> bool {
        true
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Ok(json!({
            "pid": std::process::id(),
            "uptime_secs": self.started.elapsed().as_secs(),
            "started_at_unix": self.started_at_unix,
            "available_parallelism": parallelism,
            "version": env!("CARGO_PKG_VERSION"),
        }))
    }
}
