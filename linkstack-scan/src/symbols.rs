use crate::discover::ArchiveInfo;
use anyhow::Context;
use fs_err::File;
use object::{Object, ObjectSymbol};
use std::fmt;
use std::io::Read;
use tracing::{debug, warn};

/// A symbol some archive member defines.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct DefinedSymbol(Vec<u8>);

/// A symbol some archive member references but does not define.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct UndefinedSymbol(Vec<u8>);

impl DefinedSymbol {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl UndefinedSymbol {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&UndefinedSymbol> for DefinedSymbol {
    fn from(value: &UndefinedSymbol) -> Self {
        Self(value.0.clone())
    }
}

impl From<&DefinedSymbol> for UndefinedSymbol {
    fn from(value: &DefinedSymbol) -> Self {
        Self(value.0.clone())
    }
}

// Symbol names are byte strings; display is lossy so diagnostics stay readable
// even for mangled or non-UTF-8 names.
impl fmt::Display for DefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for DefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DefinedSymbol")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl fmt::Display for UndefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for UndefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UndefinedSymbol")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

/// Symbols extracted from one archive.
#[derive(Clone, Debug, Default)]
pub struct ArchiveSymbols {
    pub defined: Vec<DefinedSymbol>,
    pub undefined: Vec<UndefinedSymbol>,
}

/// Symbol access port.
///
/// Table and ordering logic go through this so they can be tested against an
/// in-memory implementation.
pub trait SymbolReader {
    fn read(&self, archive: &ArchiveInfo) -> anyhow::Result<ArchiveSymbols>;
}

/// Filesystem-backed [`SymbolReader`] that parses `ar` members with `object`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectSymbolReader;

impl SymbolReader for ObjectSymbolReader {
    fn read(&self, archive: &ArchiveInfo) -> anyhow::Result<ArchiveSymbols> {
        let file = File::open(archive.path.as_std_path())
            .with_context(|| format!("open {}", archive.path))?;
        let mut members = ar::Archive::new(file);
        let mut out = ArchiveSymbols::default();

        loop {
            match members.next_entry() {
                None => break,
                Some(Err(e)) => {
                    // Truncated or non-ar content; keep whatever we already read.
                    warn!(archive = %archive, error = %e, "unreadable archive member, stopping scan");
                    break;
                }
                Some(Ok(mut member)) => {
                    let mut buf = Vec::new();
                    if member.read_to_end(&mut buf).is_err() {
                        continue;
                    }
                    let parsed = match object::File::parse(&*buf) {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            debug!(archive = %archive, error = %e, "skipping non-object member");
                            continue;
                        }
                    };
                    for symbol in parsed.symbols() {
                        let Ok(name) = symbol.name_bytes() else {
                            continue;
                        };
                        if symbol.is_definition() {
                            out.defined.push(DefinedSymbol(name.to_vec()));
                        } else if symbol.is_undefined() {
                            out.undefined.push(UndefinedSymbol(name.to_vec()));
                        }
                    }
                }
            }
        }

        Ok(out)
    }
}
