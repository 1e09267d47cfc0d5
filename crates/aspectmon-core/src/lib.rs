//! aspectmon core: the `Aspect` contract, the registered aspect set, the
//! built-in aspect types, and the error surface shared by the adapter.
//!
//! This crate carries no transport or runtime dependencies; the HTTP
//! listener and pipeline hooks live in `aspectmon-axum`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Snapshot accessors run inside the metrics listener, so every fallible
//! path must surface as `AspectMonError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod aspect;
pub mod aspects;
pub mod error;
pub mod registry;

pub use aspect::{Aspect, Snapshot};
pub use aspects::{
    CounterAspect, GaugeAspect, HistogramAspect, LabeledCounterAspect, RuntimeAspect,
};
/// Shared result type.
pub use error::{AspectMonError, ErrorCode, Result};
pub use registry::AspectSet;
