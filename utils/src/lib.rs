//! Shared infrastructure utilities for Folio.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename), plus
//!   no-clobber persistence under a browser-style numbered name.

pub mod atomic_write;

pub use atomic_write::{atomic_write, numbered_file_name, persist_new_unique};
