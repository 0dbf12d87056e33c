//! Top-level facade crate for the gradebook service.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use gradebook_core::*;
}

pub mod server {
    pub use gradebook_server::*;
}
