//! Operational HTTP endpoints of the host app.
//!
//! - `/healthz` : liveness

use axum::{http::StatusCode, response::IntoResponse};

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
