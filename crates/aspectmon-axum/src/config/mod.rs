//! Adapter config loader (strict parsing).

pub mod schema;

use std::fs;

use aspectmon_core::error::{AspectMonError, Result};

pub use schema::{AppConfig, AppSection, BindErrorPolicy, MetricsSection};

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path).map_err(|e| {
        AspectMonError::BadConfig(format!("cannot open aspectmon config {path}: {e}"))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| AspectMonError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
