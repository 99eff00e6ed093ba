use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk report produced by a link-order resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkReport {
    pub schema: String,
    pub tool: ToolInfo,

    /// Directory the resolver scanned for archives.
    pub root: String,

    pub generated_at: DateTime<Utc>,

    #[serde(default)]
    pub archives: Vec<ArchiveRecord>,

    /// Archive file names in resolved link order (dependents first).
    #[serde(default)]
    pub order: Vec<String>,

    pub summary: ReportSummary,
}

impl LinkReport {
    pub fn new(tool: ToolInfo, root: String) -> Self {
        Self {
            schema: crate::schema::LINKSTACK_REPORT_V1.to_string(),
            tool,
            root,
            generated_at: Utc::now(),
            archives: vec![],
            order: vec![],
            summary: ReportSummary::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Per-archive symbol accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub name: String,
    pub path: String,

    #[serde(default)]
    pub defined: u64,

    #[serde(default)]
    pub undefined: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub archives_total: u64,

    /// Distinct dependent -> dependency edges derived from symbol references.
    #[serde(default)]
    pub edges_total: u64,

    /// Undefined symbols no scanned archive defines (resolved by the toolchain
    /// or the final link, not by us).
    #[serde(default)]
    pub unresolved_symbols: u64,
}
