//! Baseline process statistics sampled at scrape time.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use sysinfo::{ProcessesToUpdate, System};

/// Wall-clock and monotonic start markers captured once at boot.
#[derive(Debug, Clone, Copy)]
pub struct ProcessClock {
    started: Instant,
    start_unix_secs: f64,
}

impl ProcessClock {
    pub fn start() -> Self {
        let start_unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self { started: Instant::now(), start_unix_secs }
    }

    pub fn start_time_seconds(&self) -> f64 {
        self.start_unix_secs
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Resident memory of this process in bytes, `None` if the platform does not
/// expose it.
pub fn resident_memory_bytes() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid).map(|p| p.memory())
}
