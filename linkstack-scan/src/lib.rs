//! Archive discovery and symbol extraction.
//!
//! linkstack consumes whatever static archives a foreign build system dropped
//! into the output tree. It is intentionally tolerant here: an archive that
//! cannot be parsed contributes an empty symbol set instead of failing the
//! whole scan, so link-order resolution still works when the tree contains
//! stripped or exotic members.

mod discover;
mod symbols;
mod tables;

pub use discover::{ArchiveInfo, discover_archives};
pub use symbols::{
    ArchiveSymbols, DefinedSymbol, ObjectSymbolReader, SymbolReader, UndefinedSymbol,
};
pub use tables::{SymbolTables, TableError, build_symbol_tables};
