pub mod entry;
pub mod error;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use entry::{Environment, Main, MainFactory};
pub use error::{LoadError, LoadResult, ProtocolError, ProtocolResult};
pub use models::*;
pub use resolver::{SchemeResolver, TypeResolver};
