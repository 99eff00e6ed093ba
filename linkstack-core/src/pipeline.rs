use camino::Utf8Path;
use linkstack_order::{OrderError, dependency_edge_count, resolve_order};
use linkstack_scan::{
    ArchiveInfo, ObjectSymbolReader, SymbolReader, SymbolTables, TableError, build_symbol_tables,
    discover_archives,
};
use linkstack_types::report::{ArchiveRecord, LinkReport, ReportSummary, ToolInfo};
use thiserror::Error;
use tracing::{debug, info};

/// Failure modes of a resolution run.
///
/// Analysis failures mean the archive set cannot be linked as-is and map to
/// exit code 2; runtime failures (I/O and the like) map to exit code 1.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("link conflict: {0}")]
    Conflict(#[from] TableError),

    #[error("link order: {0}")]
    Order(#[from] OrderError),

    #[error(transparent)]
    Runtime(#[from] anyhow::Error),
}

impl ResolveError {
    /// True when the inputs, not the tool, are at fault.
    pub fn is_analysis_failure(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Order(_))
    }

    /// Recommended process exit code.
    pub fn exit_code(&self) -> u8 {
        if self.is_analysis_failure() { 2 } else { 1 }
    }
}

/// Archives and symbol tables, before ordering.
#[derive(Clone, Debug)]
pub struct ScanOutcome {
    pub archives: Vec<ArchiveInfo>,
    pub tables: SymbolTables,
}

/// A completed resolution: everything found plus the computed link order.
#[derive(Clone, Debug)]
pub struct LinkResolution {
    pub archives: Vec<ArchiveInfo>,
    pub ordered: Vec<ArchiveInfo>,
    pub tables: SymbolTables,
}

/// Scan `base` with the default filesystem symbol reader.
pub fn scan(base: &Utf8Path) -> Result<ScanOutcome, ResolveError> {
    scan_with(base, &ObjectSymbolReader)
}

pub fn scan_with(base: &Utf8Path, reader: &dyn SymbolReader) -> Result<ScanOutcome, ResolveError> {
    if !base.is_dir() {
        return Err(anyhow::anyhow!("search dir `{base}` is not a directory").into());
    }

    let archives = discover_archives(base);
    debug!(count = archives.len(), base = %base, "discovered archives");

    let tables = build_symbol_tables(&archives, reader)?;
    Ok(ScanOutcome { archives, tables })
}

/// Scan `base` and compute the link order with the default symbol reader.
pub fn resolve(base: &Utf8Path) -> Result<LinkResolution, ResolveError> {
    resolve_with(base, &ObjectSymbolReader)
}

pub fn resolve_with(
    base: &Utf8Path,
    reader: &dyn SymbolReader,
) -> Result<LinkResolution, ResolveError> {
    let ScanOutcome { archives, tables } = scan_with(base, reader)?;
    let ordered = resolve_order(&archives, &tables)?;
    info!(archives = archives.len(), "resolved link order");
    Ok(LinkResolution {
        archives,
        ordered,
        tables,
    })
}

/// Per-archive symbol accounting, in discovery order.
pub fn archive_records(archives: &[ArchiveInfo], tables: &SymbolTables) -> Vec<ArchiveRecord> {
    archives
        .iter()
        .map(|archive| ArchiveRecord {
            name: archive.name.clone(),
            path: archive.path.to_string(),
            defined: tables.defined_count(archive),
            undefined: tables
                .undefined
                .iter()
                .filter(|(_, a)| a == archive)
                .count() as u64,
        })
        .collect()
}

/// Build the `linkstack.report.v1` artifact for a completed resolution.
pub fn build_report(resolution: &LinkResolution, root: &Utf8Path, tool: ToolInfo) -> LinkReport {
    let mut report = LinkReport::new(tool, root.to_string());
    report.archives = archive_records(&resolution.archives, &resolution.tables);
    report.order = resolution
        .ordered
        .iter()
        .map(|archive| archive.name.clone())
        .collect();
    report.summary = ReportSummary {
        archives_total: resolution.archives.len() as u64,
        edges_total: dependency_edge_count(&resolution.tables) as u64,
        unresolved_symbols: resolution.tables.unresolved_count() as u64,
    };
    report
}
