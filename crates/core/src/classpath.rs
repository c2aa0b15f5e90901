//! Classpath assembly for packaged and unpacked applications.
//!
//! The assembled classpath always starts with the bootstrap resolver's own
//! locations (or the package itself when the bootstrap resolver keeps them
//! private), followed by every nested or sibling archive in enumeration order.

use crate::config::LoaderConfig;
use crate::error::AssemblyError;
use crate::protocol::{ArchiveScheme, DirectoryScheme};
use nestjar_api::{Classpath, Location, SchemeResolver, TypeResolver};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Where the running package lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// A single packaged archive
    Archive(PathBuf),
    /// An unpacked package directory
    Directory(PathBuf),
}

impl PackageSource {
    pub fn detect(path: &Path) -> Result<Self, AssemblyError> {
        let metadata = std::fs::metadata(path).map_err(|source| AssemblyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.is_dir() {
            Ok(PackageSource::Directory(path.to_path_buf()))
        } else {
            Ok(PackageSource::Archive(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            PackageSource::Archive(path) | PackageSource::Directory(path) => path,
        }
    }

    /// Scheme resolver serving the package's own resources.
    pub fn scheme_resolver(&self) -> Arc<dyn SchemeResolver> {
        match self {
            PackageSource::Archive(path) => Arc::new(ArchiveScheme::new(path)),
            PackageSource::Directory(path) => Arc::new(DirectoryScheme::new(path)),
        }
    }
}

pub struct ClasspathAssembler {
    scheme: String,
    suffix: String,
}

impl ClasspathAssembler {
    pub fn new(scheme: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(&config.scheme, &config.archive_suffix)
    }

    pub fn assemble(
        &self,
        bootstrap: &dyn TypeResolver,
        source: &PackageSource,
    ) -> Result<Classpath, AssemblyError> {
        match source {
            PackageSource::Archive(path) => self.assemble_archive(bootstrap, path),
            PackageSource::Directory(path) => self.assemble_directory(bootstrap, path),
        }
    }

    /// Open the archive at `path`, enumerate it and close it again.
    pub fn assemble_archive(
        &self,
        bootstrap: &dyn TypeResolver,
        path: &Path,
    ) -> Result<Classpath, AssemblyError> {
        let file = File::open(path).map_err(|source| AssemblyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = ZipArchive::new(file).map_err(|source| AssemblyError::Archive {
            path: path.to_path_buf(),
            source,
        })?;
        self.assemble_open_archive(bootstrap, path, &mut archive)
    }

    /// Build a classpath from an archive the caller already opened.
    pub fn assemble_open_archive<R: Read + Seek>(
        &self,
        bootstrap: &dyn TypeResolver,
        path: &Path,
        archive: &mut ZipArchive<R>,
    ) -> Result<Classpath, AssemblyError> {
        let mut locations = self.head(bootstrap);

        debug!("Adding internal archives of {}", path.display());
        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(|source| AssemblyError::Archive {
                path: path.to_path_buf(),
                source,
            })?;
            if entry.is_dir() || !entry.name().ends_with(&self.suffix) {
                continue;
            }
            debug!("Adding internal archive: {}", entry.name());
            locations.push(Location::nested(&self.scheme, entry.name()));
        }

        Ok(Classpath::new(locations))
    }

    /// Build a classpath from an unpacked package directory and its sibling archives.
    pub fn assemble_directory(
        &self,
        bootstrap: &dyn TypeResolver,
        dir: &Path,
    ) -> Result<Classpath, AssemblyError> {
        let mut locations = self.head(bootstrap);

        debug!("Adding sibling archives of {}", dir.display());
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| AssemblyError::Io {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&self.suffix));
            if !entry.file_type().is_file() || !matches {
                continue;
            }
            debug!("Adding sibling archive: {}", entry.path().display());
            locations.push(Location::sibling(&self.scheme, entry.path()));
        }

        Ok(Classpath::new(locations))
    }

    fn head(&self, bootstrap: &dyn TypeResolver) -> Vec<Location> {
        match bootstrap.locations() {
            Some(locations) if !locations.is_empty() => {
                debug!("Using {} bootstrap locations", locations.len());
                locations
            }
            _ => vec![Location::outer(&self.scheme)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestjar_api::{Address, LoadError, LoadResult, LoadedType, LocationKind};
    use std::io::Write;
    use tempfile::tempdir;

    struct Opaque(Option<Vec<Location>>);

    impl TypeResolver for Opaque {
        fn load_type(&self, name: &str) -> LoadResult<Arc<LoadedType>> {
            Err(LoadError::TypeNotFound(name.to_string()))
        }

        fn load_resource(&self, path: &str) -> LoadResult<Vec<u8>> {
            Err(LoadError::ResourceNotFound(path.to_string()))
        }

        fn locations(&self) -> Option<Vec<Location>> {
            self.0.clone()
        }
    }

    fn write_package(path: &Path, entries: &[&str]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        for name in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(b"x").unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_archive_with_nested_archives() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("app.jar");
        write_package(
            &package,
            &["nestjar.boot", "lib/b.jar", "com/example/Main.class", "lib/a.jar"],
        );

        let assembler = ClasspathAssembler::new("application", ".jar");
        let classpath = assembler
            .assemble(&Opaque(None), &PackageSource::detect(&package).unwrap())
            .unwrap();

        let addresses: Vec<String> = classpath.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            addresses,
            vec![
                "application:/",
                "jar:application:/lib/b.jar!/",
                "jar:application:/lib/a.jar!/",
            ]
        );
        assert_eq!(classpath.locations()[0].kind, LocationKind::OuterArchive);
        assert_eq!(
            classpath.locations()[1].kind,
            LocationKind::NestedArchiveEntry("lib/b.jar".to_string())
        );
    }

    #[test]
    fn test_archive_without_nested_archives() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("app.jar");
        write_package(&package, &["nestjar.boot"]);

        let classpath = ClasspathAssembler::new("application", ".jar")
            .assemble_archive(&Opaque(None), &package)
            .unwrap();
        assert_eq!(classpath.len(), 1);
    }

    #[test]
    fn test_bootstrap_locations_come_first() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("app.jar");
        write_package(&package, &["lib/a.jar"]);

        let host = Location::bootstrap(Address::direct("host", "/"));
        let classpath = ClasspathAssembler::new("application", ".jar")
            .assemble_archive(&Opaque(Some(vec![host.clone()])), &package)
            .unwrap();

        assert_eq!(classpath.locations()[0], host);
        assert_eq!(classpath.len(), 2);
    }

    #[test]
    fn test_directory_siblings() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("z.jar"), b"").unwrap();
        std::fs::write(dir.path().join("a.jar"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/deep.jar"), b"").unwrap();

        let classpath = ClasspathAssembler::new("application", ".jar")
            .assemble(
                &Opaque(None),
                &PackageSource::detect(dir.path()).unwrap(),
            )
            .unwrap();

        let addresses: Vec<String> = classpath.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            addresses,
            vec![
                "application:/",
                "jar:application:/a.jar!/",
                "jar:application:/z.jar!/",
            ]
        );
        assert!(matches!(
            classpath.locations()[1].kind,
            LocationKind::SiblingArchiveFile(_)
        ));
    }

    #[test]
    fn test_invalid_archive_is_fatal() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("broken.jar");
        std::fs::write(&package, b"not a zip").unwrap();

        let result = ClasspathAssembler::new("application", ".jar")
            .assemble_archive(&Opaque(None), &package);
        assert!(matches!(result, Err(AssemblyError::Archive { .. })));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempdir().unwrap();
        let result = PackageSource::detect(&dir.path().join("absent.jar"));
        assert!(matches!(result, Err(AssemblyError::Io { .. })));
    }
}
