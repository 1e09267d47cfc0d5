#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use aspectmon_axum::config::{self, BindErrorPolicy};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
metrics:
  listen: "0.0.0.0:9000"
  on_bind_eror: disable # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.app.listen, "0.0.0.0:8080");
    assert_eq!(cfg.metrics.listen, "0.0.0.0:9000");
    assert!(cfg.metrics.enabled);
    assert!(cfg.metrics.runtime_aspect);
    assert_eq!(cfg.metrics.on_bind_error, BindErrorPolicy::Fatal);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
app:
  listen: "127.0.0.1:3000"
metrics:
  enabled: true
  listen: "127.0.0.1:3001"
  on_bind_error: disable
  runtime_aspect: false
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.metrics.listen_addr().unwrap().port(), 3001);
    assert_eq!(cfg.metrics.on_bind_error, BindErrorPolicy::Disable);
    assert!(!cfg.metrics.runtime_aspect);
}

#[test]
fn rejects_unknown_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn rejects_shared_listen_address() {
    let bad = r#"
version: 1
app:
  listen: "127.0.0.1:9000"
metrics:
  listen: "127.0.0.1:9000"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
}

#[test]
fn rejects_bad_addresses_and_port_zero() {
    for bad in [
        "version: 1\nmetrics:\n  listen: \"not-an-addr\"\n",
        "version: 1\napp:\n  listen: \"localhost\"\n",
        "version: 1\nmetrics:\n  listen: \"127.0.0.1:0\"\n",
    ] {
        let err = config::load_from_str(bad).expect_err("must fail");
        assert_eq!(err.code().as_str(), "BAD_CONFIG");
    }
}

#[test]
fn disabled_metrics_skip_address_checks() {
    let ok = r#"
version: 1
metrics:
  enabled: false
  listen: "0.0.0.0:8080"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert!(!cfg.metrics.enabled);
}

#[test]
fn rejects_same_port_behind_wildcard_address() {
    for (app, metrics) in [
        ("0.0.0.0:9000", "127.0.0.1:9000"),
        ("127.0.0.1:9000", "0.0.0.0:9000"),
        ("[::]:9000", "127.0.0.1:9000"),
    ] {
        let yaml = format!(
            "version: 1\napp:\n  listen: \"{app}\"\nmetrics:\n  listen: \"{metrics}\"\n"
        );
        let err = config::load_from_str(&yaml).expect_err("must fail");
        assert_eq!(err.code().as_str(), "BAD_CONFIG", "{app} vs {metrics}");
    }
}

#[test]
fn same_port_on_distinct_concrete_ips_is_allowed() {
    let ok = r#"
version: 1
app:
  listen: "127.0.0.1:9000"
metrics:
  listen: "127.0.0.2:9000"
"#;
    config::load_from_str(ok).expect("must parse");
}

#[test]
fn missing_config_file_names_the_path() {
    let err = config::load_from_file("/nonexistent/aspectmon.yaml").expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
    assert!(err.to_string().contains("/nonexistent/aspectmon.yaml"));
}
