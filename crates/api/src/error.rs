/// Failures raised while registering schemes or resolving virtual addresses.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Scheme already registered: {0}")]
    DuplicateScheme(String),
    #[error("Unknown scheme: {0}")]
    UnknownScheme(String),
    #[error("Unknown resource: {0}")]
    ResourceNotFound(String),
    #[error("Malformed address: {0}")]
    MalformedAddress(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(String),
}

impl ProtocolError {
    /// Whether this error only means "nothing at this address".
    pub fn is_not_found(&self) -> bool {
        match self {
            ProtocolError::ResourceNotFound(_) => true,
            ProtocolError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

/// Failures raised by type and resource lookups.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Type not found: {0}")]
    TypeNotFound(String),
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Probe of {location} failed: {source}")]
    Probe {
        location: String,
        #[source]
        source: ProtocolError,
    },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LoadError::TypeNotFound(_) | LoadError::ResourceNotFound(_)
        )
    }
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
