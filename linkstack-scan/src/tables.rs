use crate::discover::ArchiveInfo;
use crate::symbols::{ArchiveSymbols, DefinedSymbol, SymbolReader, UndefinedSymbol};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Cross-archive symbol lookup tables.
#[derive(Clone, Debug, Default)]
pub struct SymbolTables {
    /// Which archive defines each symbol.
    pub defined: HashMap<DefinedSymbol, ArchiveInfo>,

    /// Every undefined reference, paired with the archive that makes it.
    pub undefined: Vec<(UndefinedSymbol, ArchiveInfo)>,

    /// Definitions observed per archive name. The winner map above collapses
    /// tolerated duplicates; accounting must not.
    pub defined_counts: HashMap<String, u64>,
}

impl SymbolTables {
    /// Definitions observed in `archive`, duplicates included.
    pub fn defined_count(&self, archive: &ArchiveInfo) -> u64 {
        self.defined_counts
            .get(&archive.name)
            .copied()
            .unwrap_or(0)
    }

    /// The archive that defines `symbol`, if any was scanned.
    pub fn resolver_of(&self, symbol: &UndefinedSymbol) -> Option<&ArchiveInfo> {
        self.defined.get(&symbol.into())
    }

    /// References no scanned archive satisfies.
    pub fn unresolved_count(&self) -> usize {
        self.undefined
            .iter()
            .filter(|(symbol, _)| self.resolver_of(symbol).is_none())
            .count()
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("`{first}` and `{second}` both define symbol `{symbol}`")]
    DuplicateDefinition {
        first: String,
        second: String,
        symbol: DefinedSymbol,
    },
}

/// Build lookup tables across `archives`.
///
/// An archive whose symbols cannot be read contributes an empty symbol set. A
/// symbol defined by two archives is an error only when some archive also
/// references it; unreferenced duplicates cannot change the link outcome.
pub fn build_symbol_tables(
    archives: &[ArchiveInfo],
    reader: &dyn SymbolReader,
) -> Result<SymbolTables, TableError> {
    let mut tables = SymbolTables::default();
    let mut contested: Vec<(DefinedSymbol, ArchiveInfo, ArchiveInfo)> = Vec::new();

    for archive in archives {
        let symbols = match reader.read(archive) {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!(archive = %archive, error = %e, "treating unreadable archive as symbol-free");
                ArchiveSymbols::default()
            }
        };

        for symbol in symbols.defined {
            *tables
                .defined_counts
                .entry(archive.name.clone())
                .or_insert(0) += 1;
            if let Some(prior) = tables.defined.insert(symbol.clone(), archive.clone()) {
                contested.push((symbol, prior, archive.clone()));
            }
        }
        for symbol in symbols.undefined {
            tables.undefined.push((symbol, archive.clone()));
        }
    }

    for (symbol, first, second) in contested {
        let referenced = tables
            .undefined
            .iter()
            .any(|(undefined, _)| DefinedSymbol::from(undefined) == symbol);
        if referenced {
            return Err(TableError::DuplicateDefinition {
                first: first.name,
                second: second.name,
                symbol,
            });
        }
        debug!(symbol = %symbol, "duplicate definition is never referenced, ignoring");
    }

    Ok(tables)
}
