//! Deferred entry-point bootstrap.
//!
//! `Start -> DescriptorRead -> PropertiesApplied -> EntryPointResolved ->
//! EntryPointInvoked -> exit status`. Any failure on the way is reported once
//! and mapped to [`FAILURE_STATUS`].

use crate::config::DEFAULT_DESCRIPTOR;
use crate::descriptor::StartupDescriptor;
use crate::error::{BootError, EntryPointLoadError};
use crate::logging::report_failure;
use nestjar_api::{Environment, Main, MainFactory, TypeResolver};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::debug;

/// Exit status reported when the bootstrap sequence fails.
pub const FAILURE_STATUS: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    DescriptorRead,
    PropertiesApplied,
    EntryPointResolved,
    EntryPointInvoked,
}

/// Native constructors bound to entry-point type names.
#[derive(Default, Clone)]
pub struct EntryPointCatalog {
    factories: HashMap<String, MainFactory>,
}

impl EntryPointCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, name: impl Into<String>, factory: MainFactory) -> Self {
        self.insert(name, factory);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, factory: MainFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn get(&self, name: &str) -> Option<MainFactory> {
        self.factories.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

pub struct Bootstrapper {
    loader: Arc<dyn TypeResolver>,
    catalog: EntryPointCatalog,
    environment: Arc<dyn Environment>,
    descriptor: String,
}

impl Bootstrapper {
    pub fn new(
        loader: Arc<dyn TypeResolver>,
        catalog: EntryPointCatalog,
        environment: Arc<dyn Environment>,
    ) -> Self {
        Self {
            loader,
            catalog,
            environment,
            descriptor: DEFAULT_DESCRIPTOR.to_string(),
        }
    }

    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = descriptor.into();
        self
    }

    /// Run the whole sequence and turn the outcome into an exit status.
    pub fn run(&self, args: &[String]) -> i32 {
        let status = match self.launch(args) {
            Ok(status) => status,
            Err(e) => {
                report_failure(format_args!("Bootstrap failed: {e}"));
                FAILURE_STATUS
            }
        };
        debug!("Exit status {}", status);
        status
    }

    pub fn launch(&self, args: &[String]) -> Result<i32, BootError> {
        enter(Stage::Start);

        let descriptor = StartupDescriptor::read(self.loader.as_ref(), &self.descriptor)?;
        debug!("Entry point {}", descriptor.entry_point);
        enter(Stage::DescriptorRead);

        descriptor.apply(self.environment.as_ref());
        enter(Stage::PropertiesApplied);

        let factory = self.resolve(&descriptor.entry_point)?;
        enter(Stage::EntryPointResolved);

        enter(Stage::EntryPointInvoked);
        catch_unwind(AssertUnwindSafe(|| {
            let mut main: Box<dyn Main> = factory();
            main.run(args)
        }))
        .map_err(|_| BootError::Panicked(descriptor.entry_point.clone()))
    }

    /// Resolve `name` through the loader and find the constructor bound to it.
    pub fn resolve(&self, name: &str) -> Result<MainFactory, EntryPointLoadError> {
        let loaded = self
            .loader
            .load_type(name)
            .map_err(|source| EntryPointLoadError::NotFound {
                name: name.to_string(),
                source,
            })?;
        if !loaded.shape.is_instantiable() {
            return Err(EntryPointLoadError::NotInstantiable(loaded.name.clone()));
        }
        self.catalog
            .get(&loaded.name)
            .ok_or_else(|| EntryPointLoadError::NotAnEntryPoint(loaded.name.clone()))
    }
}

fn enter(stage: Stage) {
    debug!("Bootstrap stage {:?}", stage);
}
