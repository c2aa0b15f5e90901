pub mod archive;
pub mod bootstrap;
pub mod classpath;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod lazy;
pub mod loader;
pub mod logging;
pub mod properties;
pub mod protocol;

pub use bootstrap::{Bootstrapper, EntryPointCatalog, FAILURE_STATUS, Stage};
pub use classpath::{ClasspathAssembler, PackageSource};
pub use config::LoaderConfig;
pub use descriptor::StartupDescriptor;
pub use error::Result;
pub use lazy::Lazy;
pub use loader::{ClasspathResolver, DelegatingLoader, PrivilegedTable};
pub use properties::SystemProperties;
pub use protocol::ProtocolRegistry;
