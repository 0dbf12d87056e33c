//! Gradebook server library entry.
//!
//! This crate wires the config loader, shared state, request middleware,
//! assignment handlers, and the metrics exporter into one axum router. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;
