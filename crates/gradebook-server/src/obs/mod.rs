//! Observability: subscriber setup, request middleware, and the in-process
//! metrics registry rendered by `/metrics`.

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod process;
