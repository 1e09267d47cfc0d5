//! Demo host application.
//!
//! Owns the aspects mutated by request handling and wires the metrics
//! pass-through hook plus the increment hooks into its router. The layer
//! order mirrors a typical chain: pass-through first, then the request
//! counter, in-flight gauge, latency histogram, and per-route counts.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use aspectmon_core::error::Result;
use aspectmon_core::{
    Aspect, AspectSet, CounterAspect, GaugeAspect, HistogramAspect, LabeledCounterAspect,
};

use crate::hook::PassThroughLayer;
use crate::middleware::{count_by_path, count_requests, observe_latency, track_in_flight};
use crate::ops;

#[derive(Clone)]
pub struct HostAspects {
    pub counter: Arc<CounterAspect>,
    pub in_flight: Arc<GaugeAspect>,
    pub latency: Arc<HistogramAspect>,
    pub paths: Arc<LabeledCounterAspect>,
}

impl HostAspects {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(CounterAspect::new("Counter")),
            in_flight: Arc::new(GaugeAspect::new("in_flight")),
            latency: Arc::new(HistogramAspect::new("latency")),
            paths: Arc::new(LabeledCounterAspect::new("paths")),
        }
    }

    /// Registered set handed to the metrics listener.
    pub fn aspect_set(&self) -> Result<AspectSet> {
        AspectSet::from_aspects([
            Arc::clone(&self.counter) as Arc<dyn Aspect>,
            Arc::clone(&self.in_flight) as Arc<dyn Aspect>,
            Arc::clone(&self.latency) as Arc<dyn Aspect>,
            Arc::clone(&self.paths) as Arc<dyn Aspect>,
        ])
    }
}

impl Default for HostAspects {
    fn default() -> Self {
        Self::new()
    }
}

async fn hello() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "title": "Counter - Hello World" })))
}

pub fn build_router(aspects: &HostAspects, hook: PassThroughLayer) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/healthz", get(ops::healthz))
        .route_layer(from_fn_with_state(Arc::clone(&aspects.paths), count_by_path))
        .layer(from_fn_with_state(Arc::clone(&aspects.latency), observe_latency))
        .layer(from_fn_with_state(Arc::clone(&aspects.in_flight), track_in_flight))
        .layer(from_fn_with_state(Arc::clone(&aspects.counter), count_requests))
        .layer(hook)
}
