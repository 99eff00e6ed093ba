//! Dependency ordering for static archives.
//!
//! This crate owns *in what order* archives appear on the link line. It does
//! not own how symbols are read; that's `linkstack-scan`.

mod graph;

pub use graph::{OrderError, dependency_edge_count, resolve_order};
