//! aspectmon axum adapter.
//!
//! This crate wires an [`AspectSet`](aspectmon_core::AspectSet) to a
//! background metrics listener and provides the request-pipeline hooks a
//! host application layers onto its own router. It is consumed by the demo
//! binary (`main.rs`) and by integration tests.

pub mod app;
pub mod config;
pub mod hook;
pub mod middleware;
pub mod ops;
pub mod server;

pub use hook::{PassThrough, PassThroughLayer};
pub use server::{metrics, metrics_router, MetricsServer};
