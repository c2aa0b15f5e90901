use super::ClasspathResolver;
use nestjar_api::{Address, Classpath, LoadResult, LoadedType, Location, TypeResolver};
use std::sync::Arc;
use tracing::trace;

/// Ordered (prefix, resolver) pairs; the first matching prefix wins.
#[derive(Clone, Default)]
pub struct PrivilegedTable {
    routes: Vec<(String, Arc<dyn TypeResolver>)>,
}

impl PrivilegedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route every prefix in `prefixes` to the same resolver.
    pub fn from_prefixes<S: AsRef<str>>(prefixes: &[S], resolver: Arc<dyn TypeResolver>) -> Self {
        prefixes
            .iter()
            .fold(Self::new(), |table, prefix| table.route(prefix.as_ref(), resolver.clone()))
    }

    pub fn route(mut self, prefix: impl Into<String>, resolver: Arc<dyn TypeResolver>) -> Self {
        self.routes.push((prefix.into(), resolver));
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn TypeResolver>> {
        self.routes
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix.as_str()))
            .map(|(_, resolver)| resolver)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(prefix, _)| prefix.as_str())
    }
}

/// Loader for nested-archive classpaths.
///
/// Names under a privileged prefix are handed verbatim to the routed resolver,
/// so singleton-sensitive types keep the identity they already have in the
/// host. Everything else is scanned from the loader's own classpath.
pub struct DelegatingLoader {
    privileged: PrivilegedTable,
    classpath: ClasspathResolver,
}

impl DelegatingLoader {
    pub fn new(privileged: PrivilegedTable, classpath: ClasspathResolver) -> Self {
        Self {
            privileged,
            classpath,
        }
    }

    pub fn classpath(&self) -> &Classpath {
        self.classpath.classpath()
    }

    pub fn privileged(&self) -> &PrivilegedTable {
        &self.privileged
    }

    /// Address a resource would be read from.
    pub fn find_resource(&self, path: &str) -> LoadResult<Address> {
        self.classpath.find_resource(path)
    }

    /// Native URL for an address handed out by this loader, when one exists.
    pub fn native_address(&self, address: &Address) -> Option<url::Url> {
        self.classpath.registry().native(address)
    }
}

/// Resource paths are matched against prefixes in dotted form.
fn dotted(path: &str) -> String {
    path.trim_start_matches('/').replace('/', ".")
}

impl TypeResolver for DelegatingLoader {
    fn load_type(&self, name: &str) -> LoadResult<Arc<LoadedType>> {
        if let Some(resolver) = self.privileged.lookup(name) {
            trace!("Delegating type {} to bootstrap resolver", name);
            return resolver.load_type(name);
        }
        self.classpath.load_type(name)
    }

    fn load_resource(&self, path: &str) -> LoadResult<Vec<u8>> {
        if let Some(resolver) = self.privileged.lookup(&dotted(path)) {
            trace!("Delegating resource {} to bootstrap resolver", path);
            return resolver.load_resource(path);
        }
        self.classpath.load_resource(path)
    }

    fn locations(&self) -> Option<Vec<Location>> {
        Some(self.classpath.classpath().locations().to_vec())
    }
}
