use super::location::Location;
use std::sync::Arc;

/// What a type unit's bytes say about how it can be instantiated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Concrete,
    Abstract,
    Interface,
    /// Not a recognizable class file
    Opaque,
}

impl TypeShape {
    pub fn is_instantiable(self) -> bool {
        matches!(self, TypeShape::Concrete | TypeShape::Opaque)
    }
}

/// A type unit defined by exactly one resolver.
///
/// Resolvers hand these out as `Arc<LoadedType>`; two lookups observe the same
/// definition only if the pointers are equal.
#[derive(Debug)]
pub struct LoadedType {
    pub name: String,
    pub origin: Location,
    pub bytes: Arc<[u8]>,
    pub shape: TypeShape,
}

impl LoadedType {
    pub fn new(
        name: impl Into<String>,
        origin: Location,
        bytes: Vec<u8>,
        shape: TypeShape,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            bytes: bytes.into(),
            shape,
        }
    }
}

/// Resource path of the unit defining the dotted type `name`.
pub fn type_unit_path(name: &str) -> String {
    format!("{}.class", name.replace('.', "/"))
}
