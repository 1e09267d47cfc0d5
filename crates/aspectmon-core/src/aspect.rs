//! The `Aspect` contract.

use crate::error::Result;

/// Serialized snapshot value of an aspect.
pub type Snapshot = serde_json::Value;

/// A named unit of measurement exposed by the metrics listener.
///
/// Implementations own their state and must make `snapshot` safe to call
/// concurrently with whatever mutates it (atomics, locks, ...). The metrics
/// listener only ever reads through this trait.
pub trait Aspect: Send + Sync {
    /// Name of the aspect. Non-root aspects are served at `/<name>`.
    fn name(&self) -> &str;

    /// Whether the snapshot is merged into the root document instead of
    /// getting its own path.
    fn in_root(&self) -> bool;

    /// Current value, taken at request time.
    fn snapshot(&self) -> Result<Snapshot>;
}
