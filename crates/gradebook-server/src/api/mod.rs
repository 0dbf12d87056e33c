//! Assignment REST handlers.

pub mod assignments;
