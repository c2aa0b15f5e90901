//! In-memory handles on archives that were read through a virtual scheme.

use nestjar_api::{ProtocolError, ProtocolResult};
use std::io::{Cursor, Read, Seek};
use std::sync::Arc;
use zip::ZipArchive;
use zip::result::ZipError;

/// An archive held entirely in memory.
///
/// Cloning the inner `ZipArchive` only copies a cursor and an `Arc` of the
/// central directory, so reads from several threads never contend.
#[derive(Clone)]
pub struct ArchiveReader {
    name: String,
    archive: ZipArchive<Cursor<Arc<[u8]>>>,
}

impl ArchiveReader {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> ProtocolResult<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_error)?;
        Ok(Self {
            name: name.into(),
            archive,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the entry `inner`; `ResourceNotFound` if the archive has no such file.
    pub fn read(&self, inner: &str) -> ProtocolResult<Vec<u8>> {
        let mut archive = self.archive.clone();
        read_entry(&mut archive, inner.trim_start_matches('/'), &self.name)
    }

    pub fn contains(&self, inner: &str) -> bool {
        let inner = inner.trim_start_matches('/');
        self.archive.file_names().any(|n| n == inner)
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }
}

impl std::fmt::Debug for ArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("name", &self.name)
            .field("entries", &self.archive.len())
            .finish()
    }
}

/// Upper bound on the buffer reserved up front for an entry.
const MAX_CAPACITY_HINT: u64 = 1 << 20;

pub(crate) fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    archive_name: &str,
) -> ProtocolResult<Vec<u8>> {
    let not_found = || ProtocolError::ResourceNotFound(format!("{archive_name}!/{name}"));
    if name.is_empty() {
        return Err(not_found());
    }
    match archive.by_name(name) {
        Ok(mut entry) => {
            if entry.is_dir() {
                return Err(not_found());
            }
            // the header size is untrusted; read_to_end grows past the hint
            let hint = entry.size().min(MAX_CAPACITY_HINT) as usize;
            let mut bytes = Vec::with_capacity(hint);
            entry.read_to_end(&mut bytes)?;
            Ok(bytes)
        }
        Err(ZipError::FileNotFound) => Err(not_found()),
        Err(e) => Err(archive_error(e)),
    }
}

pub(crate) fn archive_error(e: ZipError) -> ProtocolError {
    match e {
        ZipError::Io(io) => ProtocolError::Io(io),
        other => ProtocolError::Archive(other.to_string()),
    }
}
