use crate::error::{LoadResult, ProtocolResult};
use crate::models::{LoadedType, Location};
use std::sync::Arc;
use url::Url;

/// Resolves type units and raw resources by name.
///
/// Implementations must be safe to call from several threads at once.
pub trait TypeResolver: Send + Sync {
    fn load_type(&self, name: &str) -> LoadResult<Arc<LoadedType>>;

    fn load_resource(&self, path: &str) -> LoadResult<Vec<u8>>;

    /// Locations this resolver searches, if it is willing to expose them.
    fn locations(&self) -> Option<Vec<Location>> {
        None
    }
}

/// Serves the path portion of addresses under one virtual scheme.
pub trait SchemeResolver: Send + Sync {
    /// Read the resource at `path`; `ResourceNotFound` if there is none.
    fn open(&self, path: &str) -> ProtocolResult<Vec<u8>>;

    /// Platform-native URL for `path`, when one exists.
    fn native(&self, _path: &str) -> Option<Url> {
        None
    }
}
