//! Shared DTOs (schemas-as-code) for the linkstack workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const LINKSTACK_REPORT_V1: &str = "linkstack.report.v1";
}
