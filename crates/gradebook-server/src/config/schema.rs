use std::net::SocketAddr;

use gradebook_core::error::{GradebookError, Result};
use gradebook_core::GradePolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradebookConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub log: LogSection,

    #[serde(default)]
    pub grading: GradingSection,
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            log: LogSection::default(),
            grading: GradingSection::default(),
        }
    }
}

impl GradebookConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GradebookError::InvalidInput(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.grading.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            GradebookError::InvalidInput(format!(
                "server.listen must be a socket address ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One flattened JSON object per line.
    #[default]
    Json,
    /// Human-readable output for local runs.
    Pretty,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    #[serde(default)]
    pub format: LogFormat,

    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GradingSection {
    /// Upper bound for grades. Unset means no upper bound.
    #[serde(default)]
    pub max_grade: Option<f64>,
}

impl GradingSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_grade {
            if !max.is_finite() || max <= 0.0 {
                return Err(GradebookError::InvalidInput(
                    "grading.max_grade must be a positive number".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn policy(&self) -> GradePolicy {
        GradePolicy { max_grade: self.max_grade }
    }
}
