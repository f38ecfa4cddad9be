use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed module manifest.
///
/// Entries keep declaration order and duplicates are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub requires: Vec<Package>,
    pub excludes: Vec<Package>,
    pub replaces: Vec<PackageMapping>,
}

impl Document {
    /// First `require` entry for `path`.
    pub fn require(&self, path: &str) -> Option<&Package> {
        self.requires.iter().find(|pkg| pkg.path == path)
    }

    pub fn is_excluded(&self, path: &str, version: &str) -> bool {
        self.excludes
            .iter()
            .any(|pkg| pkg.path == path && pkg.version == version)
    }

    /// Target of the first `replace` whose source matches `path` at `version`.
    pub fn replacement(&self, path: &str, version: &str) -> Option<&Package> {
        self.replaces
            .iter()
            .find(|m| m.from.path == path && m.from.version == version)
            .map(|m| &m.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    pub path: String,
    pub version: String,
}

impl Package {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" {}", self.path, self.version)
    }
}

/// `from` is replaced by `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageMapping {
    pub from: Package,
    pub to: Package,
}

impl fmt::Display for PackageMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.from, self.to)
    }
}
