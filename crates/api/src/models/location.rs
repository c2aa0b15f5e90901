use super::address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a classpath location comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    /// The running package itself
    OuterArchive,
    /// An archive stored as an entry of the outer archive
    NestedArchiveEntry(String),
    /// A standalone archive next to an unpacked package
    SiblingArchiveFile(PathBuf),
    /// A location already exposed by the bootstrap resolver
    Bootstrap,
}

impl LocationKind {
    pub fn label(&self) -> &'static str {
        match self {
            LocationKind::OuterArchive => "outer",
            LocationKind::NestedArchiveEntry(_) => "nested",
            LocationKind::SiblingArchiveFile(_) => "sibling",
            LocationKind::Bootstrap => "bootstrap",
        }
    }
}

/// An addressable unit of code and resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub kind: LocationKind,
    pub address: Address,
}

impl Location {
    pub fn new(kind: LocationKind, address: Address) -> Self {
        Self { kind, address }
    }

    pub fn outer(scheme: &str) -> Self {
        Self::new(LocationKind::OuterArchive, Address::direct(scheme, "/"))
    }

    pub fn nested(scheme: &str, entry: &str) -> Self {
        Self::new(
            LocationKind::NestedArchiveEntry(entry.to_string()),
            Address::archive_root(scheme, entry),
        )
    }

    /// Sibling archives are addressed by file name relative to the package directory.
    pub fn sibling(scheme: &str, path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(
            LocationKind::SiblingArchiveFile(path.to_path_buf()),
            Address::archive_root(scheme, &file_name),
        )
    }

    pub fn bootstrap(address: Address) -> Self {
        Self::new(LocationKind::Bootstrap, address)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.address, f)
    }
}

/// Ordered, immutable search path. The first matching location wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classpath {
    locations: Arc<[Location]>,
}

impl Classpath {
    pub fn new(locations: Vec<Location>) -> Self {
        Self {
            locations: locations.into(),
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl From<Vec<Location>> for Classpath {
    fn from(locations: Vec<Location>) -> Self {
        Self::new(locations)
    }
}

impl<'a> IntoIterator for &'a Classpath {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
