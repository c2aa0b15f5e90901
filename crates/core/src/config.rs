use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DESCRIPTOR: &str = "nestjar.boot";
pub const DEFAULT_SCHEME: &str = "application";
pub const DEFAULT_ARCHIVE_SUFFIX: &str = ".jar";

/// Names under these prefixes always resolve through the bootstrap resolver.
pub const DEFAULT_PRIVILEGED_PREFIXES: &[&str] = &["nestjar.runtime.", "nestjar.logging."];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Resource naming the entry point and its startup properties
    pub descriptor: String,
    /// Virtual scheme under which the package is served
    pub scheme: String,
    pub archive_suffix: String,
    pub privileged_prefixes: Vec<String>,
    pub debug: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            descriptor: DEFAULT_DESCRIPTOR.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_string(),
            privileged_prefixes: DEFAULT_PRIVILEGED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            debug: false,
        }
    }
}

impl LoaderConfig {
    /// Defaults, then the optional JSON file, then `NESTJAR_*` environment overrides.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = var("NESTJAR_DEBUG") {
            self.debug = !matches!(value.trim(), "" | "0" | "false");
        }
        if let Some(value) = var("NESTJAR_DESCRIPTOR").filter(|v| !v.trim().is_empty()) {
            self.descriptor = value.trim().to_string();
        }
        if let Some(value) = var("NESTJAR_SCHEME").filter(|v| !v.trim().is_empty()) {
            self.scheme = value.trim().to_string();
        }
        self
    }
}
