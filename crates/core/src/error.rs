use nestjar_api::{LoadError, ProtocolError};
use std::path::PathBuf;
use thiserror::Error;

pub use crate::lazy::InitializationError;

/// Failure enumerating the package while building a classpath.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Unable to access resource {resource}: {source}")]
    Unreadable {
        resource: String,
        #[source]
        source: LoadError,
    },
    #[error("Resource {0} does not name an entry point")]
    MissingEntryPoint(String),
    #[error("Resource {0} is not valid UTF-8")]
    Encoding(String),
}

#[derive(Error, Debug)]
pub enum EntryPointLoadError {
    #[error("Unable to load entry point {name}: {source}")]
    NotFound {
        name: String,
        #[source]
        source: LoadError,
    },
    #[error("Entry point {0} cannot be default-constructed")]
    NotInstantiable(String),
    #[error("Type {0} does not implement the entry point contract")]
    NotAnEntryPoint(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that ends the bootstrap sequence before the entry point runs.
#[derive(Error, Debug)]
pub enum BootError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    EntryPoint(#[from] EntryPointLoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Entry point {0} panicked")]
    Panicked(String),
}

pub type Result<T> = std::result::Result<T, BootError>;
