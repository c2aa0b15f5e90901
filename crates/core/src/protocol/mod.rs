//! Virtual scheme registration and address resolution.
//!
//! A `ProtocolRegistry` maps scheme names to `SchemeResolver`s. Each scheme can
//! be registered once; the table is never torn down. The process-wide instance
//! is reached through [`ProtocolRegistry::global`], while tests build isolated
//! registries with [`ProtocolRegistry::new`].

mod schemes;

pub use schemes::{ArchiveScheme, DirectoryScheme, MemoryScheme};

use crate::archive::ArchiveReader;
use nestjar_api::{ARCHIVE_SCHEME, Address, ProtocolError, ProtocolResult, SchemeResolver};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use url::Url;

static GLOBAL: OnceCell<Arc<ProtocolRegistry>> = OnceCell::new();

pub struct ProtocolRegistry {
    schemes: RwLock<HashMap<String, Arc<dyn SchemeResolver>>>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self {
            schemes: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> Arc<ProtocolRegistry> {
        GLOBAL.get_or_init(|| Arc::new(ProtocolRegistry::new())).clone()
    }

    /// Register `resolver` for `scheme`. Fails if the scheme is taken.
    pub fn register(&self, scheme: &str, resolver: Arc<dyn SchemeResolver>) -> ProtocolResult<()> {
        if scheme == ARCHIVE_SCHEME {
            return Err(ProtocolError::DuplicateScheme(scheme.to_string()));
        }
        let mut schemes = self.schemes.write().unwrap_or_else(PoisonError::into_inner);
        if schemes.contains_key(scheme) {
            return Err(ProtocolError::DuplicateScheme(scheme.to_string()));
        }
        debug!("Registered scheme '{}'", scheme);
        schemes.insert(scheme.to_string(), resolver);
        Ok(())
    }

    pub fn is_registered(&self, scheme: &str) -> bool {
        let schemes = self.schemes.read().unwrap_or_else(PoisonError::into_inner);
        schemes.contains_key(scheme)
    }

    pub fn resolver(&self, scheme: &str) -> ProtocolResult<Arc<dyn SchemeResolver>> {
        let schemes = self.schemes.read().unwrap_or_else(PoisonError::into_inner);
        schemes
            .get(scheme)
            .cloned()
            .ok_or_else(|| ProtocolError::UnknownScheme(scheme.to_string()))
    }

    /// Read the bytes behind `address`.
    pub fn resolve(&self, address: &Address) -> ProtocolResult<Vec<u8>> {
        match address {
            Address::Direct { scheme, path } => self.resolver(scheme)?.open(path),
            Address::Nested {
                scheme,
                entry,
                inner,
            } => self.open_archive(scheme, entry)?.read(inner),
        }
    }

    /// Parse and resolve a textual address.
    pub fn resolve_str(&self, address: &str) -> ProtocolResult<Vec<u8>> {
        self.resolve(&address.parse()?)
    }

    /// Open the archive stored at `entry` under `scheme` without extracting it.
    pub fn open_archive(&self, scheme: &str, entry: &str) -> ProtocolResult<ArchiveReader> {
        let root = Address::archive_root(scheme, entry);
        let bytes = self.resolver(scheme)?.open(&format!("/{}", entry.trim_start_matches('/')))?;
        ArchiveReader::from_bytes(root.to_string(), bytes)
    }

    /// Platform-native URL equivalent to `address`, if the scheme can provide one.
    ///
    /// Archives nested inside a packaged archive have no native form.
    pub fn native(&self, address: &Address) -> Option<Url> {
        match address {
            Address::Direct { scheme, path } => self.resolver(scheme).ok()?.native(path),
            Address::Nested {
                scheme,
                entry,
                inner,
            } => {
                let outer = self
                    .resolver(scheme)
                    .ok()?
                    .native(&format!("/{entry}"))?;
                if outer.scheme() != "file" {
                    return None;
                }
                Url::parse(&format!("{ARCHIVE_SCHEME}:{outer}!/{inner}")).ok()
            }
        }
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
