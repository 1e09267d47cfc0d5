//! Host-side increment hooks.
//!
//! Each hook mutates one aspect and then passes control to the next stage.
//! Install with `axum::middleware::from_fn_with_state`, binding the aspect
//! as state:
//!
//! ```ignore
//! router.layer(from_fn_with_state(counter.clone(), count_requests))
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use aspectmon_core::{CounterAspect, GaugeAspect, HistogramAspect, LabeledCounterAspect};

/// Increment the bound counter once per request.
pub async fn count_requests(
    State(counter): State<Arc<CounterAspect>>,
    req: Request,
    next: Next,
) -> Response {
    counter.inc();
    next.run(req).await
}

/// Keeps the gauge balanced even if the request future is dropped.
struct InFlightGuard(Arc<GaugeAspect>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.dec();
    }
}

/// Track requests currently inside the chain.
pub async fn track_in_flight(
    State(gauge): State<Arc<GaugeAspect>>,
    req: Request,
    next: Next,
) -> Response {
    gauge.inc();
    let _guard = InFlightGuard(gauge);
    next.run(req).await
}

/// Record time spent in the rest of the chain.
pub async fn observe_latency(
    State(hist): State<Arc<HistogramAspect>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(req).await;
    hist.observe(start.elapsed());
    response
}

/// Count requests per matched route.
///
/// Uses the route template, not the raw path, so the label set stays bounded.
/// The template is only known once routing ran: install with `route_layer`.
/// Requests without a matched route are counted as `unmatched`.
pub async fn count_by_path(
    State(labels): State<Arc<LabeledCounterAspect>>,
    req: Request,
    next: Next,
) -> Response {
    match req.extensions().get::<MatchedPath>() {
        Some(path) => labels.inc(path.as_str()),
        None => labels.inc("unmatched"),
    }
    next.run(req).await
}
