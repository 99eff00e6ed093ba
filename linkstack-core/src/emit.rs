//! Cargo build-script directive rendering.

use linkstack_scan::ArchiveInfo;
use tracing::warn;

/// Render `cargo:` link directives for archives already in link order.
///
/// Each archive contributes a `rustc-link-search` for its parent directory and
/// a `rustc-link-lib` for its stripped name. Archives with a malformed name or
/// no parent directory are skipped.
pub fn link_directives(ordered: &[ArchiveInfo]) -> Vec<String> {
    let mut out = Vec::with_capacity(ordered.len() * 2);
    for archive in ordered {
        let (Some(dir), Some(link_name)) = (archive.search_dir(), archive.link_name()) else {
            warn!(archive = %archive, "no linkable name or parent directory, skipping");
            continue;
        };
        out.push(format!("cargo:rustc-link-search=native={dir}"));
        out.push(format!("cargo:rustc-link-lib=static={link_name}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;

    fn archive(name: &str, dir: &str) -> ArchiveInfo {
        ArchiveInfo {
            name: name.to_string(),
            path: Utf8PathBuf::from(dir).join(name),
        }
    }

    #[test]
    fn renders_search_then_lib_per_archive() {
        let ordered = vec![
            archive("libapp.a", "/out/app"),
            archive("libtinkwrap.a", "/out/deps"),
        ];
        let directives = link_directives(&ordered);
        assert_eq!(
            directives,
            vec![
                "cargo:rustc-link-search=native=/out/app",
                "cargo:rustc-link-lib=static=app",
                "cargo:rustc-link-search=native=/out/deps",
                "cargo:rustc-link-lib=static=tinkwrap",
            ]
        );
    }

    #[test]
    fn malformed_archive_names_are_skipped() {
        let ordered = vec![archive("weird.a", "/out"), archive("libok.a", "/out")];
        let directives = link_directives(&ordered);
        assert_eq!(
            directives,
            vec![
                "cargo:rustc-link-search=native=/out",
                "cargo:rustc-link-lib=static=ok",
            ]
        );
    }

    #[test]
    fn empty_order_renders_nothing() {
        assert!(link_directives(&[]).is_empty());
    }
}
