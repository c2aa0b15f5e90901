//! Type and resource loading from an assembled classpath.
//!
//! Two roles are kept apart:
//! - [`ClasspathResolver`] scans an immutable classpath in order.
//! - [`DelegatingLoader`] routes privileged names to a bootstrap resolver and
//!   everything else to its own `ClasspathResolver`.

mod delegating;
pub mod shape;

pub use delegating::{DelegatingLoader, PrivilegedTable};

use crate::archive::ArchiveReader;
use crate::lazy::Lazy;
use crate::protocol::ProtocolRegistry;
use dashmap::DashMap;
use nestjar_api::{
    Address, Classpath, LoadError, LoadResult, LoadedType, Location, ProtocolError,
    ProtocolResult, TypeResolver, type_unit_path,
};
use std::sync::Arc;
use tracing::{trace, warn};

struct ClasspathEntry {
    location: Location,
    /// Opened on first probe for locations inside a nested archive
    archive: Option<Lazy<ArchiveReader>>,
}

impl ClasspathEntry {
    fn new(registry: &Arc<ProtocolRegistry>, location: Location) -> Self {
        let archive = match &location.address {
            Address::Nested { scheme, entry, .. } => {
                let registry = registry.clone();
                let scheme = scheme.clone();
                let entry = entry.clone();
                Some(Lazy::new(move || {
                    registry
                        .open_archive(&scheme, &entry)
                        .map(Some)
                        .map_err(Into::into)
                }))
            }
            Address::Direct { .. } => None,
        };
        Self { location, archive }
    }

    fn probe(&self, registry: &ProtocolRegistry, path: &str) -> ProtocolResult<Option<Vec<u8>>> {
        let result = match &self.archive {
            Some(archive) => archive
                .get()
                .map_err(|e| ProtocolError::Archive(e.to_string()))
                .and_then(|reader| reader.read(&self.inner_path(path))),
            None => registry.resolve(&self.location.address.join(path)),
        };
        match result {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn inner_path(&self, path: &str) -> String {
        match self.location.address.join(path) {
            Address::Nested { inner, .. } => inner,
            Address::Direct { path, .. } => path,
        }
    }
}

/// Resolves names by scanning a classpath in order; the first hit wins.
///
/// Each type name is defined at most once, so repeated lookups return the same
/// `Arc<LoadedType>`.
pub struct ClasspathResolver {
    registry: Arc<ProtocolRegistry>,
    classpath: Classpath,
    entries: Vec<ClasspathEntry>,
    defined: DashMap<String, Arc<LoadedType>>,
    expose_locations: bool,
}

impl ClasspathResolver {
    pub fn new(registry: Arc<ProtocolRegistry>, classpath: Classpath) -> Self {
        let entries = classpath
            .iter()
            .cloned()
            .map(|location| ClasspathEntry::new(&registry, location))
            .collect();
        Self {
            registry,
            classpath,
            entries,
            defined: DashMap::new(),
            expose_locations: false,
        }
    }

    /// Report the classpath through [`TypeResolver::locations`].
    pub fn exposing_locations(mut self, expose: bool) -> Self {
        self.expose_locations = expose;
        self
    }

    pub fn classpath(&self) -> &Classpath {
        &self.classpath
    }

    pub fn registry(&self) -> &Arc<ProtocolRegistry> {
        &self.registry
    }

    /// Address of the first location holding `path`.
    pub fn find_resource(&self, path: &str) -> LoadResult<Address> {
        let path = path.trim_start_matches('/');
        match self.find(path)? {
            Some((location, _)) => Ok(location.address.join(path)),
            None => Err(LoadError::ResourceNotFound(path.to_string())),
        }
    }

    fn find(&self, path: &str) -> LoadResult<Option<(Location, Vec<u8>)>> {
        let last = self.entries.len().saturating_sub(1);

        for (index, entry) in self.entries.iter().enumerate() {
            trace!("Probing {} for {}", entry.location, path);
            match entry.probe(&self.registry, path) {
                Ok(Some(bytes)) => return Ok(Some((entry.location.clone(), bytes))),
                Ok(None) => continue,
                Err(source) if index == last => {
                    return Err(LoadError::Probe {
                        location: entry.location.to_string(),
                        source,
                    });
                }
                Err(e) => {
                    warn!("Skipping {} while looking up {}: {}", entry.location, path, e);
                }
            }
        }
        Ok(None)
    }
}

impl TypeResolver for ClasspathResolver {
    fn load_type(&self, name: &str) -> LoadResult<Arc<LoadedType>> {
        if let Some(defined) = self.defined.get(name) {
            return Ok(defined.clone());
        }

        let (origin, bytes) = self
            .find(&type_unit_path(name))?
            .ok_or_else(|| LoadError::TypeNotFound(name.to_string()))?;
        let shape = shape::inspect(name, &bytes);

        let defined = self
            .defined
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(LoadedType::new(name, origin, bytes, shape)));
        Ok(defined.clone())
    }

    fn load_resource(&self, path: &str) -> LoadResult<Vec<u8>> {
        let path = path.trim_start_matches('/');
        self.find(path)?
            .map(|(_, bytes)| bytes)
            .ok_or_else(|| LoadError::ResourceNotFound(path.to_string()))
    }

    fn locations(&self) -> Option<Vec<Location>> {
        self.expose_locations
            .then(|| self.classpath.locations().to_vec())
    }
}
