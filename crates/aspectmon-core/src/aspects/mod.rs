//! Built-in aspect types.
//!
//! All state is kept in atomics (or a `DashMap` of atomics) so that request
//! handlers can mutate and the metrics listener can snapshot concurrently
//! without locks and without lost updates.

pub mod counter;
pub mod gauge;
pub mod histogram;
pub mod labeled;
pub mod runtime;

pub use counter::CounterAspect;
pub use gauge::GaugeAspect;
pub use histogram::HistogramAspect;
pub use labeled::LabeledCounterAspect;
pub use runtime::RuntimeAspect;
