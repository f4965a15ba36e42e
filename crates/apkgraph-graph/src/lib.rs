//! Dependency graph engine: breadth-first construction from a
//! [`DependencySource`](apkgraph_core::source::DependencySource), reciprocal
//! cycle detection, transitive queries, and text/DOT rendering.

pub mod graph;
pub mod render;

pub use graph::{BuildOptions, DependencyGraph, LookupFailure};
