//! Core types shared by every apkgraph crate: package identifiers, the
//! [`source::DependencySource`] capability, CLI input validation, and the
//! global configuration file.

pub mod config;
pub mod mode;
pub mod package;
pub mod source;
