//! Shared application state for the gradebook server.
//!
//! Cheap to clone: everything lives behind `Arc`s and is built once at
//! startup from the validated config.

use std::sync::Arc;

use gradebook_core::error::Result;
use gradebook_core::SubmissionStore;

use crate::config::GradebookConfig;
use crate::obs::metrics::{HttpMetrics, Sample};
use crate::obs::process::{self, ProcessClock};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<SubmissionStore>,
    metrics: Arc<HttpMetrics>,
}

struct AppStateInner {
    cfg: GradebookConfig,
    clock: ProcessClock,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can report a bad config instead of panicking.
    pub fn new(cfg: GradebookConfig) -> Result<Self> {
        cfg.validate()?;

        let store = Arc::new(SubmissionStore::with_policy(cfg.grading.policy()));
        tracing::debug!(max_grade = ?cfg.grading.max_grade, "submission store ready");

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, clock: ProcessClock::start() }),
            store,
            metrics: Arc::new(HttpMetrics::default()),
        })
    }

    pub fn cfg(&self) -> &GradebookConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> Arc<SubmissionStore> {
        Arc::clone(&self.store)
    }

    pub fn metrics(&self) -> Arc<HttpMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    /// Render the full `/metrics` body: HTTP series plus store and process gauges.
    pub fn render_metrics(&self) -> String {
        let clock = &self.inner.clock;
        let mut extra = vec![
            Sample {
                name: "gradebook_submissions",
                help: "Submissions currently held in memory.",
                value: self.store.len() as f64,
            },
            Sample {
                name: "gradebook_submissions_graded",
                help: "Submissions that have a grade.",
                value: self.store.graded_count() as f64,
            },
            Sample {
                name: "process_start_time_seconds",
                help: "Start time of the process since unix epoch in seconds.",
                value: clock.start_time_seconds(),
            },
            Sample {
                name: "process_uptime_seconds",
                help: "Seconds since the process started.",
                value: clock.uptime_seconds(),
            },
        ];
        if let Some(rss) = process::resident_memory_bytes() {
            extra.push(Sample {
                name: "process_resident_memory_bytes",
                help: "Resident memory size in bytes.",
                value: rss as f64,
            });
        }
        self.metrics.render(&extra)
    }
}
