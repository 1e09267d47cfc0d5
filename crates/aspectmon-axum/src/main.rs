//! aspectmon demo host.
//!
//! - Main app on `app.listen` (default 0.0.0.0:8080): `GET /`, `/healthz`
//! - Metrics listener on `metrics.listen` (default 0.0.0.0:9000)
//!
//! ```text
//! curl http://localhost:9000/          # root aspects (runtime)
//! curl http://localhost:9000/Counter   # increments on every app request
//! ```
//!
//! Usage: `aspectmon-demo [config.yaml]`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use aspectmon_axum::{app, config, metrics, PassThroughLayer};
use aspectmon_core::error::{AspectMonError, Result};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.code().as_str(), "aspectmon-demo failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path)?,
        None => config::AppConfig::default(),
    };
    let listen = cfg.app.listen_addr()?;

    let aspects = app::HostAspects::new();
    let server = metrics(&cfg.metrics, aspects.aspect_set()?).await?;
    let hook = server
        .as_ref()
        .map(|s| s.layer())
        .unwrap_or_else(PassThroughLayer::new);

    let router = app::build_router(&aspects, hook);

    tracing::info!(%listen, "aspectmon-demo starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|source| AspectMonError::Bind { addr: listen, source })?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AspectMonError::Internal(format!("server failed: {e}")))?;

    if let Some(server) = server {
        server.shutdown().await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
