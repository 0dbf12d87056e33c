//! Config loader (strict parsing).
//!
//! Lookup order: `$GRADEBOOK_CONFIG` (must exist), then `gradebook.yaml` in
//! the working directory, then built-in defaults. `$GRADEBOOK_LISTEN`
//! overrides `server.listen` afterwards.

pub mod schema;

use std::fs;
use std::path::Path;

use gradebook_core::error::{GradebookError, Result};

pub use schema::{GradebookConfig, GradingSection, LogFormat, LogSection, ServerSection};

pub const CONFIG_ENV: &str = "GRADEBOOK_CONFIG";
pub const LISTEN_ENV: &str = "GRADEBOOK_LISTEN";
pub const DEFAULT_CONFIG_PATH: &str = "gradebook.yaml";

pub fn load() -> Result<GradebookConfig> {
    let mut cfg = match std::env::var(CONFIG_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        Err(_) => GradebookConfig::default(),
    };

    if let Ok(listen) = std::env::var(LISTEN_ENV) {
        cfg.server.listen = listen;
        cfg.validate()?;
    }
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<GradebookConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GradebookError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GradebookConfig> {
    let cfg: GradebookConfig = serde_yaml::from_str(s)
        .map_err(|e| GradebookError::InvalidInput(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
