//! Embeddable core library for linkstack.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for calling from
//! a build script or other host process.
//!
//! # Port traits
//!
//! Symbol access is abstracted behind [`SymbolReader`]; the default adapter
//! ([`ObjectSymbolReader`]) parses `ar` archives with `object`.
//!
//! # Entry points
//!
//! - [`resolve`](pipeline::resolve) — discover archives and compute link order
//! - [`link_directives`](emit::link_directives) — render cargo build-script directives
//! - [`build_report`](pipeline::build_report) — produce the `linkstack.report.v1` DTO

pub mod emit;
pub mod pipeline;

pub use emit::link_directives;
pub use pipeline::{
    LinkResolution, ResolveError, ScanOutcome, archive_records, build_report, resolve,
    resolve_with, scan, scan_with,
};

// Re-export scan/order types so embedders don't need the inner crates directly.
pub use linkstack_order::OrderError;
pub use linkstack_scan::{
    ArchiveInfo, ArchiveSymbols, DefinedSymbol, ObjectSymbolReader, SymbolReader, SymbolTables,
    TableError, UndefinedSymbol,
};
