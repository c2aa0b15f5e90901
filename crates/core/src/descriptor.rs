//! Startup descriptor parsing.
//!
//! The descriptor is UTF-8 text. Line 1 names the entry-point type; every
//! further line is `key=value`, or a bare `key` meaning `key=true`. Lines with an
//! empty key or value are skipped with a warning. Blank lines are ignored.

use crate::error::DescriptorError;
use nestjar_api::{Environment, TypeResolver};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupDescriptor {
    pub entry_point: String,
    /// In file order; later keys override earlier ones when applied
    pub properties: Vec<(String, String)>,
    /// Property lines that were ignored
    pub skipped: Vec<String>,
}

impl StartupDescriptor {
    /// Load and parse `resource` through `loader`.
    pub fn read(loader: &dyn TypeResolver, resource: &str) -> Result<Self, DescriptorError> {
        let bytes = loader.load_resource(resource).map_err(|source| {
            if source.is_not_found() {
                DescriptorError::MissingEntryPoint(resource.to_string())
            } else {
                DescriptorError::Unreadable {
                    resource: resource.to_string(),
                    source,
                }
            }
        })?;
        let text =
            String::from_utf8(bytes).map_err(|_| DescriptorError::Encoding(resource.to_string()))?;
        Self::parse(resource, &text)
    }

    pub fn parse(resource: &str, text: &str) -> Result<Self, DescriptorError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines();

        let entry_point = lines.next().map(str::trim).unwrap_or_default();
        if entry_point.is_empty() {
            return Err(DescriptorError::MissingEntryPoint(resource.to_string()));
        }

        let mut properties = Vec::new();
        let mut skipped = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            match parse_property(line) {
                Some(property) => properties.push(property),
                None => {
                    warn!("Ignoring invalid property definition '{}'", line);
                    skipped.push(line.to_string());
                }
            }
        }

        Ok(Self {
            entry_point: entry_point.to_string(),
            properties,
            skipped,
        })
    }

    /// Apply the properties to `environment` in file order.
    pub fn apply(&self, environment: &dyn Environment) {
        for (key, value) in &self.properties {
            debug!("Setting property \"{}\" = \"{}\"", key, value);
            environment.set(key, value);
        }
    }
}

fn parse_property(line: &str) -> Option<(String, String)> {
    let (key, value) = match line.find('=') {
        None => (line.trim(), "true"),
        Some(0) => return None,
        Some(split) => (line[..split].trim(), line[split + 1..].trim()),
    };
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}
