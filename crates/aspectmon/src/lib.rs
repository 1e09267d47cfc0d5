//! Top-level facade crate for aspectmon.
//!
//! Re-exports the core types and the axum adapter so users can depend on a single crate.

pub mod core {
    pub use aspectmon_core::*;
}

pub mod axum {
    pub use aspectmon_axum::*;
}

pub use aspectmon_axum::{metrics, MetricsServer, PassThroughLayer};
pub use aspectmon_core::{Aspect, AspectSet, Snapshot};
