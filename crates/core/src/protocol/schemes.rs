use crate::archive::read_entry;
use crate::lazy::Lazy;
use dashmap::DashMap;
use nestjar_api::{ProtocolError, ProtocolResult, SchemeResolver};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;
use zip::ZipArchive;

type SharedArchive = Arc<Mutex<ZipArchive<File>>>;

/// Serves the entries of a packaged archive on disk.
///
/// The archive and its central directory are read on first use and kept open;
/// a failed open is retried on the next request.
pub struct ArchiveScheme {
    path: PathBuf,
    archive: Lazy<SharedArchive>,
}

impl ArchiveScheme {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source = path.clone();
        let archive = Lazy::new(move || {
            let file = File::open(&source)?;
            let archive = ZipArchive::new(file)?;
            Ok(Some(Arc::new(Mutex::new(archive))))
        });
        Self { path, archive }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemeResolver for ArchiveScheme {
    fn open(&self, path: &str) -> ProtocolResult<Vec<u8>> {
        let archive = self
            .archive
            .get()
            .map_err(|e| ProtocolError::Archive(format!("{}: {e}", self.path.display())))?;
        let mut archive = archive.lock().unwrap_or_else(PoisonError::into_inner);
        read_entry(
            &mut *archive,
            path.trim_start_matches('/'),
            &self.path.display().to_string(),
        )
    }

    fn native(&self, path: &str) -> Option<Url> {
        let archive = Url::from_file_path(std::path::absolute(&self.path).ok()?).ok()?;
        Url::parse(&format!("jar:{archive}!/{}", path.trim_start_matches('/'))).ok()
    }
}

/// Serves files below an unpacked package directory.
pub struct DirectoryScheme {
    root: PathBuf,
}

impl DirectoryScheme {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, path: &str) -> ProtocolResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ProtocolError::ResourceNotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl SchemeResolver for DirectoryScheme {
    fn open(&self, path: &str) -> ProtocolResult<Vec<u8>> {
        let file = self.locate(path)?;
        if !file.is_file() {
            return Err(ProtocolError::ResourceNotFound(path.to_string()));
        }
        Ok(std::fs::read(file)?)
    }

    fn native(&self, path: &str) -> Option<Url> {
        let file = self.locate(path).ok()?;
        if !file.exists() {
            return None;
        }
        Url::from_file_path(std::path::absolute(file).ok()?).ok()
    }
}

/// Serves resources embedded in the running process.
#[derive(Default)]
pub struct MemoryScheme {
    entries: DashMap<String, Arc<[u8]>>,
}

impl MemoryScheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, path: &str, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&self, path: &str, bytes: Vec<u8>) {
        self.entries.insert(normalize(path), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

impl SchemeResolver for MemoryScheme {
    fn open(&self, path: &str) -> ProtocolResult<Vec<u8>> {
        self.entries
            .get(&normalize(path))
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| ProtocolError::ResourceNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_directory_scheme() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("conf")).unwrap();
        std::fs::write(dir.path().join("conf/app.txt"), b"x").unwrap();

        let scheme = DirectoryScheme::new(dir.path());
        assert_eq!(scheme.open("/conf/app.txt").unwrap(), b"x");
        assert!(scheme.open("/conf").unwrap_err().is_not_found());
        assert!(scheme.open("/../etc/passwd").unwrap_err().is_not_found());

        let url = scheme.native("/conf/app.txt").unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(scheme.native("/missing").is_none());
    }

    #[test]
    fn test_archive_scheme() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.jar");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("res/a.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"abc").unwrap();
        zip.finish().unwrap();

        let scheme = ArchiveScheme::new(&path);
        assert_eq!(scheme.open("/res/a.txt").unwrap(), b"abc");
        assert!(scheme.open("/res/b.txt").unwrap_err().is_not_found());

        let url = scheme.native("/res/a.txt").unwrap();
        assert_eq!(url.scheme(), "jar");
        assert!(url.as_str().ends_with("app.jar!/res/a.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_scheme_keeps_archive_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.jar");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("a.txt", options).unwrap();
        zip.write_all(b"a").unwrap();
        zip.start_file("b.txt", options).unwrap();
        zip.write_all(b"b").unwrap();
        zip.finish().unwrap();

        let scheme = ArchiveScheme::new(&path);
        assert_eq!(scheme.open("/a.txt").unwrap(), b"a");

        // later lookups go through the handle opened by the first one
        std::fs::remove_file(&path).unwrap();
        assert_eq!(scheme.open("/b.txt").unwrap(), b"b");
        assert!(scheme.open("/c.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_archive_scheme_missing_file_is_retried() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("late.jar");
        let scheme = ArchiveScheme::new(&path);
        assert!(scheme.open("/a.txt").is_err());

        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("a.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"a").unwrap();
        zip.finish().unwrap();

        assert_eq!(scheme.open("/a.txt").unwrap(), b"a");
    }

    #[test]
    fn test_memory_scheme() {
        let scheme = MemoryScheme::new().with("a/b", b"1".to_vec());
        assert_eq!(scheme.open("/a/b").unwrap(), b"1");
        assert_eq!(scheme.open("a/b").unwrap(), b"1");
        assert!(scheme.open("/a/c").unwrap_err().is_not_found());
        assert!(scheme.native("/a/b").is_none());
    }
}
