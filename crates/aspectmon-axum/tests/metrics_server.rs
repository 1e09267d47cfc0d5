//! Metrics listener routing, failure isolation, and socket lifecycle.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tower::ServiceExt;

use aspectmon_axum::config::{BindErrorPolicy, MetricsSection};
use aspectmon_axum::{metrics, metrics_router, MetricsServer};
use aspectmon_core::error::{AspectMonError, Result};
use aspectmon_core::{Aspect, AspectSet, CounterAspect, Snapshot};

struct BrokenAspect;

impl Aspect for BrokenAspect {
    fn name(&self) -> &str {
        "broken"
    }

    fn in_root(&self) -> bool {
        false
    }

    fn snapshot(&self) -> Result<Snapshot> {
        Err(AspectMonError::Snapshot("sensor offline".into()))
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Minimal HTTP/1.1 GET over a raw socket; returns the response body.
async fn http_get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");
    let (_, body) = raw.split_once("\r\n\r\n").unwrap();
    body.to_string()
}

fn local() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

#[tokio::test]
async fn named_aspect_served_at_its_path_only() {
    let counter = Arc::new(CounterAspect::new("Counter"));
    counter.add(3);
    let set = AspectSet::new().with(counter.clone()).unwrap();
    let router = metrics_router(&set);

    assert_eq!(get(&router, "/Counter").await, (StatusCode::OK, json!(3)));
    assert_eq!(get(&router, "/").await, (StatusCode::OK, json!({})));
    assert_eq!(get(&router, "/Other").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_aspects_are_merged_by_name() {
    let hits = Arc::new(CounterAspect::root("hits"));
    let errors = Arc::new(CounterAspect::root("errors"));
    let set = AspectSet::new()
        .with(hits.clone())
        .unwrap()
        .with(errors.clone())
        .unwrap();
    let router = metrics_router(&set);

    hits.add(7);
    errors.inc();
    assert_eq!(
        get(&router, "/").await,
        (StatusCode::OK, json!({"hits": 7, "errors": 1}))
    );
    // Root-placed aspects get no path of their own.
    assert_eq!(get(&router, "/hits").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn snapshot_is_taken_per_request() {
    let counter = Arc::new(CounterAspect::new("Counter"));
    let router = metrics_router(&AspectSet::new().with(counter.clone()).unwrap());

    assert_eq!(get(&router, "/Counter").await.1, json!(0));
    counter.inc();
    assert_eq!(get(&router, "/Counter").await.1, json!(1));
}

#[tokio::test]
async fn failing_snapshot_only_breaks_its_own_path() {
    let counter = Arc::new(CounterAspect::new("Counter"));
    counter.inc();
    let set = AspectSet::new()
        .with(Arc::new(BrokenAspect))
        .unwrap()
        .with(counter)
        .unwrap();
    let router = metrics_router(&set);

    let (status, body) = get(&router, "/broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "SNAPSHOT_FAILED");

    assert_eq!(get(&router, "/Counter").await, (StatusCode::OK, json!(1)));
    assert_eq!(get(&router, "/").await.0, StatusCode::OK);
}

#[tokio::test]
async fn serves_over_socket_and_shuts_down() {
    let counter = Arc::new(CounterAspect::new("Counter"));
    counter.add(5);
    let set = AspectSet::new().with(counter).unwrap();

    let server = MetricsServer::start(local(), set.clone()).await.unwrap();
    let addr = server.local_addr();
    assert_ne!(addr.port(), 0);

    assert_eq!(http_get(addr, "/Counter").await, "5");

    server.shutdown().await.unwrap();
    assert!(TcpStream::connect(addr).await.is_err());

    // Port is released and can be bound again.
    let again = MetricsServer::start(addr, set).await.unwrap();
    again.shutdown().await.unwrap();
}

#[tokio::test]
async fn occupied_port_is_reported() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = occupied.local_addr().unwrap();

    let err = MetricsServer::start(addr, AspectSet::new())
        .await
        .expect_err("bind must fail");
    assert_eq!(err.code().as_str(), "BIND_FAILED");
    assert!(matches!(err, AspectMonError::Bind { addr: a, .. } if a == addr));
}

#[tokio::test]
async fn bind_policy_controls_failure_channel() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = occupied.local_addr().unwrap();

    let mut section = MetricsSection {
        listen: addr.to_string(),
        ..MetricsSection::default()
    };

    let err = metrics(&section, AspectSet::new())
        .await
        .expect_err("fatal policy must propagate");
    assert_eq!(err.code().as_str(), "BIND_FAILED");

    section.on_bind_error = BindErrorPolicy::Disable;
    let server = metrics(&section, AspectSet::new()).await.unwrap();
    assert!(server.is_none());
}

#[tokio::test]
async fn disabled_section_does_not_bind() {
    let section = MetricsSection {
        enabled: false,
        ..MetricsSection::default()
    };
    assert!(metrics(&section, AspectSet::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn runtime_aspect_lands_in_root_document() {
    let section = MetricsSection {
        listen: "127.0.0.1:0".into(),
        ..MetricsSection::default()
    };
    let server = metrics(&section, AspectSet::new()).await.unwrap().unwrap();

    let body = http_get(server.local_addr(), "/").await;
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["runtime"]["pid"], json!(std::process::id()));

    server.shutdown().await.unwrap();
}
