//! Gradebook core: submission model, error taxonomy, and the in-memory store.
//!
//! This crate holds the domain contracts shared by the HTTP server and any
//! tooling built on top of it. It intentionally carries no transport or
//! runtime dependencies so it can be exercised without a web stack.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `GradebookError`/`Result` so a bad
//! request can never take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod store;

/// Shared result type.
pub use error::{GradebookError, Result};
pub use model::{AssignmentType, NewSubmission, Submission, SubmissionFilter};
pub use store::{GradePolicy, SubmissionStore};
