//! Subscriber setup. `RUST_LOG` wins over `log.level` from the config.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LogSection};

pub fn init(cfg: &LogSection) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.level.as_str()));

    match cfg.format {
        LogFormat::Json => fmt()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).init(),
    }
}
