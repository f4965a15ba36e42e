//! Shared utilities for apkgraph.
//!
//! Cross-cutting concerns used by the other apkgraph crates: the error type,
//! filesystem helpers, external process spawning, and terminal status output.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
