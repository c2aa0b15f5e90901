//! Virtual resource addresses.
//!
//! Two forms are understood:
//! - `scheme:/inner-path` addresses a resource served directly by a scheme.
//! - `jar:scheme:/entry-name!/inner-path` addresses `inner-path` inside the
//!   archive `entry-name`, which is itself served by `scheme`.

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheme prefix used to open an archive reached through another scheme.
pub const ARCHIVE_SCHEME: &str = "jar";

/// Separates the archive entry from the path inside it.
pub const ARCHIVE_SEPARATOR: &str = "!/";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    /// Resource served by `scheme` at `path` (always starts with `/`).
    Direct { scheme: String, path: String },
    /// Resource `inner` inside the archive `entry` served by `scheme`.
    Nested {
        scheme: String,
        entry: String,
        inner: String,
    },
}

impl Address {
    pub fn direct(scheme: impl Into<String>, path: &str) -> Self {
        Address::Direct {
            scheme: scheme.into(),
            path: format!("/{}", path.trim_start_matches('/')),
        }
    }

    pub fn nested(scheme: impl Into<String>, entry: &str, inner: &str) -> Self {
        Address::Nested {
            scheme: scheme.into(),
            entry: entry.trim_start_matches('/').to_string(),
            inner: inner.trim_start_matches('/').to_string(),
        }
    }

    /// Root of the archive `entry` reached through `scheme`.
    pub fn archive_root(scheme: impl Into<String>, entry: &str) -> Self {
        Self::nested(scheme, entry, "")
    }

    pub fn scheme(&self) -> &str {
        match self {
            Address::Direct { scheme, .. } | Address::Nested { scheme, .. } => scheme,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Address::Nested { .. })
    }

    /// Resolve a relative resource name against this address.
    pub fn join(&self, name: &str) -> Address {
        let name = name.trim_start_matches('/');
        match self {
            Address::Direct { scheme, path } => Address::Direct {
                scheme: scheme.clone(),
                path: join_path(path, name),
            },
            Address::Nested {
                scheme,
                entry,
                inner,
            } => Address::Nested {
                scheme: scheme.clone(),
                entry: entry.clone(),
                inner: join_path(inner, name)
                    .trim_start_matches('/')
                    .to_string(),
            },
        }
    }
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

fn valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Direct { scheme, path } => write!(f, "{scheme}:{path}"),
            Address::Nested {
                scheme,
                entry,
                inner,
            } => write!(
                f,
                "{ARCHIVE_SCHEME}:{scheme}:/{entry}{ARCHIVE_SEPARATOR}{inner}"
            ),
        }
    }
}

impl FromStr for Address {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProtocolError::MalformedAddress(s.to_string());

        if let Some(rest) = s
            .strip_prefix(ARCHIVE_SCHEME)
            .and_then(|r| r.strip_prefix(':'))
        {
            let (outer, inner) = rest.split_once(ARCHIVE_SEPARATOR).ok_or_else(malformed)?;
            let (scheme, entry) = outer.split_once(':').ok_or_else(malformed)?;
            let entry = entry.trim_start_matches('/');
            if !valid_scheme(scheme) || entry.is_empty() {
                return Err(malformed());
            }
            return Ok(Address::nested(scheme, entry, inner));
        }

        let (scheme, path) = s.split_once(':').ok_or_else(malformed)?;
        if !valid_scheme(scheme) {
            return Err(malformed());
        }
        Ok(Address::direct(scheme, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direct() {
        let address: Address = "application:/config/app.properties".parse().unwrap();
        assert_eq!(
            address,
            Address::direct("application", "config/app.properties")
        );
        assert_eq!(address.to_string(), "application:/config/app.properties");
    }

    #[test]
    fn test_parse_nested() {
        let address: Address = "jar:application:/lib/util.jar!/com/example/Util.class"
            .parse()
            .unwrap();
        assert_eq!(
            address,
            Address::nested("application", "lib/util.jar", "com/example/Util.class")
        );
        assert_eq!(
            address.to_string(),
            "jar:application:/lib/util.jar!/com/example/Util.class"
        );
    }

    #[test]
    fn test_join() {
        let root = Address::archive_root("application", "lib/util.jar");
        assert_eq!(root.to_string(), "jar:application:/lib/util.jar!/");
        assert_eq!(
            root.join("/a/B.class").to_string(),
            "jar:application:/lib/util.jar!/a/B.class"
        );

        let direct = Address::direct("application", "/");
        assert_eq!(direct.join("a/B.class").to_string(), "application:/a/B.class");
    }

    #[test]
    fn test_malformed() {
        assert!("no-scheme".parse::<Address>().is_err());
        assert!("jar:application:/lib/util.jar".parse::<Address>().is_err());
        assert!("jar:application:/!/x".parse::<Address>().is_err());
        assert!("1abc:/x".parse::<Address>().is_err());
    }
}
