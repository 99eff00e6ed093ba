use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

static ARCHIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^lib(.+)\.a$").expect("archive regex"));

/// A static archive found in the scanned tree.
#[derive(Clone, Debug)]
pub struct ArchiveInfo {
    /// File name, e.g. `libfoo.a`.
    pub name: String,
    pub path: Utf8PathBuf,
}

impl ArchiveInfo {
    /// The name passed to `rustc-link-lib` (`foo` for `libfoo.a`).
    pub fn link_name(&self) -> Option<&str> {
        ARCHIVE_RE
            .captures(&self.name)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
    }

    /// The directory passed to `rustc-link-search`.
    pub fn search_dir(&self) -> Option<&Utf8Path> {
        self.path.parent()
    }
}

// Identity is the file name: two archives with the same name would collide on
// the link line regardless of where they live.
impl PartialEq for ArchiveInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ArchiveInfo {}

impl Hash for ArchiveInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ArchiveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Walk `base` and collect every `lib*.a` file.
///
/// Unreadable directory entries and non-UTF-8 paths are skipped. Duplicate
/// archive names keep the first occurrence in sorted order.
pub fn discover_archives(base: &Utf8Path) -> Vec<ArchiveInfo> {
    let mut found: Vec<ArchiveInfo> = Vec::new();

    for entry in WalkDir::new(base).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !ARCHIVE_RE.is_match(&name) {
            continue;
        }
        match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => found.push(ArchiveInfo { name, path }),
            Err(path) => warn!(path = %path.display(), "skipping non-utf8 archive path"),
        }
    }

    // Deterministic order matters.
    found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    found.dedup_by(|next, prev| {
        if next.name == prev.name {
            debug!(kept = %prev.path, dropped = %next.path, "duplicate archive name");
            true
        } else {
            false
        }
    });
    found
}
