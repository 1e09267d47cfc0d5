use std::net::SocketAddr;

use serde::Deserialize;
use aspectmon_core::error::{AspectMonError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            app: AppSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AspectMonError::UnsupportedVersion);
        }

        let app = self.app.listen_addr()?;
        if self.metrics.enabled {
            let metrics = self.metrics.listen_addr()?;
            if metrics.port() == 0 {
                return Err(AspectMonError::BadConfig(
                    "metrics.listen port must be positive".into(),
                ));
            }
            if addrs_clash(app, metrics) {
                return Err(AspectMonError::BadConfig(format!(
                    "metrics.listen ({metrics}) overlaps app.listen ({app})"
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_app_listen")]
    pub listen: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            listen: default_app_listen(),
        }
    }
}

impl AppSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_addr("app.listen", &self.listen)
    }
}

/// What to do when the metrics listener cannot bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindErrorPolicy {
    /// Propagate the bind error to the host (startup fails).
    #[default]
    Fatal,
    /// Log a warning and keep the host running without metrics.
    Disable,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_metrics_listen")]
    pub listen: String,

    #[serde(default)]
    pub on_bind_error: BindErrorPolicy,

    /// Register the built-in process statistics aspect at the root.
    #[serde(default = "default_true")]
    pub runtime_aspect: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: default_metrics_listen(),
            on_bind_error: BindErrorPolicy::default(),
            runtime_aspect: true,
        }
    }
}

impl MetricsSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_addr("metrics.listen", &self.listen)
    }
}

/// Same port on the same IP, or on any IP when either side is a wildcard.
fn addrs_clash(a: SocketAddr, b: SocketAddr) -> bool {
    a.port() == b.port()
        && (a.ip() == b.ip() || a.ip().is_unspecified() || b.ip().is_unspecified())
}

fn parse_addr(field: &str, s: &str) -> Result<SocketAddr> {
    s.parse()
        .map_err(|e| AspectMonError::BadConfig(format!("{field} must be a valid SocketAddr: {e}")))
}

fn default_app_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metrics_listen() -> String {
    "0.0.0.0:9000".into()
}
fn default_true() -> bool {
    true
}
