pub mod address;
pub mod location;
pub mod types;

pub use address::{ARCHIVE_SCHEME, ARCHIVE_SEPARATOR, Address};
pub use location::{Classpath, Location, LocationKind};
pub use types::{LoadedType, TypeShape, type_unit_path};
