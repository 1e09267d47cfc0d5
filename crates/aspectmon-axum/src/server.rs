//! Metrics listener.
//!
//! - `GET /`       : JSON object of every root-placed aspect, keyed by name
//! - `GET /<name>` : JSON snapshot of one non-root aspect
//!
//! Snapshots are taken per request. A failing aspect answers 500 on its own
//! path only; other aspects and the host's main listener are unaffected.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use aspectmon_core::error::{AspectMonError, Result};
use aspectmon_core::{Aspect, AspectSet, RuntimeAspect, Snapshot};

use crate::config::{BindErrorPolicy, MetricsSection};
use crate::hook::PassThroughLayer;

fn error_response(err: &AspectMonError) -> Response {
    let body = json!({
        "code": err.code().as_str(),
        "msg": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn serve_aspect(aspect: &dyn Aspect) -> Response {
    match aspect.snapshot() {
        Ok(v) => Json(v).into_response(),
        Err(e) => {
            tracing::error!(aspect = %aspect.name(), error = %e, "snapshot failed");
            error_response(&e)
        }
    }
}

fn serve_root(root: &[Arc<dyn Aspect>]) -> Response {
    let mut doc = serde_json::Map::with_capacity(root.len());
    for aspect in root {
        match aspect.snapshot() {
            Ok(v) => {
                doc.insert(aspect.name().to_string(), v);
            }
            Err(e) => {
                tracing::error!(aspect = %aspect.name(), error = %e, "root snapshot failed");
                return error_response(&e);
            }
        }
    }
    Json(Snapshot::Object(doc)).into_response()
}

/// Build the metrics router for a set.
///
/// Kept separate from [`MetricsServer::start`] so tests can drive it through
/// the `tower::Service` interface without a socket.
pub fn metrics_router(set: &AspectSet) -> Router {
    let root: Arc<[Arc<dyn Aspect>]> = set.root().into();
    let mut router = Router::new().route(
        "/",
        get(move || {
            let root = Arc::clone(&root);
            async move { serve_root(&root) }
        }),
    );

    for aspect in set.routed() {
        let path = format!("/{}", aspect.name());
        router = router.route(
            &path,
            get(move || {
                let aspect = Arc::clone(&aspect);
                async move { serve_aspect(aspect.as_ref()) }
            }),
        );
    }

    router
}

/// Handle to the running metrics listener.
///
/// Dropping the handle detaches the listener: it keeps serving for the rest
/// of the process. Call [`MetricsServer::shutdown`] to stop it and wait for
/// the task to finish.
#[derive(Debug)]
pub struct MetricsServer {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MetricsServer {
    /// Bind `addr` and spawn the listener task.
    ///
    /// Bind failures are returned as [`AspectMonError::Bind`].
    pub async fn start(addr: SocketAddr, set: AspectSet) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| AspectMonError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| AspectMonError::Internal(format!("metrics local_addr failed: {e}")))?;

        let app = metrics_router(&set);
        let (tx, rx) = oneshot::channel::<()>();

        // Sender dropped without a send means the handle was detached.
        let signal = async move {
            if rx.await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        tracing::info!(%local_addr, aspects = set.len(), "metrics listener bound");

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(signal).await {
                tracing::error!(error = %e, "metrics listener failed");
            }
            tracing::info!(%local_addr, "metrics listener stopped");
        });

        Ok(Self {
            local_addr,
            shutdown: Some(tx),
            task: Some(task),
        })
    }

    /// The bound address (resolves port 0 to the actual port).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Pass-through hook for the host's middleware chain.
    pub fn layer(&self) -> PassThroughLayer {
        PassThroughLayer::new()
    }

    /// Stop accepting, drain in-flight requests, and join the task.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| AspectMonError::Internal(format!("metrics task join failed: {e}")))?;
        }
        Ok(())
    }
}

/// Start the metrics listener as configured.
///
/// Returns `Ok(None)` when metrics are disabled, or when the bind fails and
/// the section's policy is [`BindErrorPolicy::Disable`].
pub async fn metrics(
    section: &MetricsSection,
    mut set: AspectSet,
) -> Result<Option<MetricsServer>> {
    if !section.enabled {
        tracing::info!("metrics disabled by config");
        return Ok(None);
    }

    if section.runtime_aspect {
        set.register(Arc::new(RuntimeAspect::new()))?;
    }

    let addr = section.listen_addr()?;
    match MetricsServer::start(addr, set).await {
        Ok(server) => Ok(Some(server)),
        Err(e @ AspectMonError::Bind { .. })
            if section.on_bind_error == BindErrorPolicy::Disable =>
        {
            tracing::warn!(error = %e, "metrics listener unavailable, continuing without metrics");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
