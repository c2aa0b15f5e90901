use nestjar_api::TypeShape;
use ristretto_classfile::{ClassAccessFlags, ClassFile};
use std::io::Cursor;
use tracing::debug;

const CLASS_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

/// Classify a type unit by its class-file access flags.
pub fn inspect(name: &str, bytes: &[u8]) -> TypeShape {
    if !bytes.starts_with(&CLASS_MAGIC) {
        return TypeShape::Opaque;
    }

    match ClassFile::from_bytes(&mut Cursor::new(bytes.to_vec())) {
        Ok(class) => {
            if class.access_flags.contains(ClassAccessFlags::INTERFACE) {
                TypeShape::Interface
            } else if class.access_flags.contains(ClassAccessFlags::ABSTRACT) {
                TypeShape::Abstract
            } else {
                TypeShape::Concrete
            }
        }
        Err(e) => {
            debug!("Unreadable class file for {}: {:?}", name, e);
            TypeShape::Opaque
        }
    }
}
