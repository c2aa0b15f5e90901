pub mod builtin;

use nestjar_api::{Address, Classpath, Environment, Location, MainFactory, ProtocolError};
use nestjar_core::error::BootError;
use nestjar_core::logging::report_failure;
use nestjar_core::{
    Bootstrapper, ClasspathAssembler, ClasspathResolver, DelegatingLoader, EntryPointCatalog,
    FAILURE_STATUS, LoaderConfig, PackageSource, PrivilegedTable, ProtocolRegistry,
    StartupDescriptor, SystemProperties,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Scheme serving the runtime's own type units.
pub const HOST_SCHEME: &str = "host";

/// Wires a package into a delegating loader and runs its deferred entry point.
pub struct Launcher {
    config: LoaderConfig,
    catalog: EntryPointCatalog,
    registry: Arc<ProtocolRegistry>,
    environment: Arc<dyn Environment>,
}

impl Launcher {
    /// Launcher on the process-wide registry and property table, with the
    /// built-in entry points bound.
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            catalog: builtin::catalog(),
            registry: ProtocolRegistry::global(),
            environment: SystemProperties::global(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<ProtocolRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = environment;
        self
    }

    pub fn bind(mut self, name: impl Into<String>, factory: MainFactory) -> Self {
        self.catalog.insert(name, factory);
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Register the package's schemes and build its loader.
    ///
    /// Schemes are registered once per registry; building a second loader on
    /// the same registry fails with `DuplicateScheme`.
    pub fn build_loader(&self, package: &Path) -> Result<Arc<DelegatingLoader>, BootError> {
        let source = PackageSource::detect(package)?;
        debug!("Package source: {:?}", source);

        // both names must be free before either is registered
        for scheme in [self.config.scheme.as_str(), HOST_SCHEME] {
            if self.registry.is_registered(scheme) {
                return Err(ProtocolError::DuplicateScheme(scheme.to_string()).into());
            }
        }
        if self.config.scheme == HOST_SCHEME {
            return Err(ProtocolError::DuplicateScheme(HOST_SCHEME.to_string()).into());
        }

        self.registry
            .register(&self.config.scheme, source.scheme_resolver())?;
        self.registry
            .register(HOST_SCHEME, Arc::new(builtin::units()))?;

        let host = Arc::new(ClasspathResolver::new(
            self.registry.clone(),
            Classpath::new(vec![
                Location::bootstrap(Address::direct(HOST_SCHEME, "/")),
                Location::outer(&self.config.scheme),
            ]),
        ));

        let classpath =
            ClasspathAssembler::from_config(&self.config).assemble(host.as_ref(), &source)?;
        debug!("Classpath has {} locations", classpath.len());

        let privileged = PrivilegedTable::from_prefixes(&self.config.privileged_prefixes, host);
        Ok(Arc::new(DelegatingLoader::new(
            privileged,
            ClasspathResolver::new(self.registry.clone(), classpath),
        )))
    }

    /// Read the package's startup descriptor without running it.
    pub fn describe(&self, loader: &DelegatingLoader) -> Result<StartupDescriptor, BootError> {
        Ok(StartupDescriptor::read(loader, &self.config.descriptor)?)
    }

    /// Run the package and return the process exit status.
    pub fn launch(&self, package: &Path, args: &[String]) -> i32 {
        let loader = match self.build_loader(package) {
            Ok(loader) => loader,
            Err(e) => {
                report_failure(format_args!("Unable to set up {}: {e}", package.display()));
                return FAILURE_STATUS;
            }
        };

        Bootstrapper::new(loader, self.catalog.clone(), self.environment.clone())
            .with_descriptor(&self.config.descriptor)
            .run(args)
    }
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(
    component: &str,
    config: &LoaderConfig,
    to_stderr: bool,
) -> Option<impl Drop + use<>> {
    Some(nestjar_core::logging::init_logging(
        component,
        to_stderr,
        config.debug,
    ))
}
