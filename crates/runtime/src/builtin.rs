//! Entry points shipped with the runtime.
//!
//! Their type units live in the host resolver under the privileged
//! `nestjar.runtime.` prefix, so packages can name them without bundling them.

use nestjar_api::{Main, type_unit_path};
use nestjar_core::protocol::MemoryScheme;
use nestjar_core::{EntryPointCatalog, SystemProperties};

pub const NOOP: &str = "nestjar.runtime.Noop";
pub const PRINT_PROPERTIES: &str = "nestjar.runtime.PrintProperties";

/// Returns 0 without doing anything.
struct Noop;

impl Main for Noop {
    fn run(&mut self, _args: &[String]) -> i32 {
        0
    }
}

/// Prints the process-wide properties, one `key=value` per line.
struct PrintProperties;

impl Main for PrintProperties {
    fn run(&mut self, _args: &[String]) -> i32 {
        for (key, value) in SystemProperties::global().snapshot() {
            println!("{key}={value}");
        }
        0
    }
}

fn noop() -> Box<dyn Main> {
    Box::new(Noop)
}

fn print_properties() -> Box<dyn Main> {
    Box::new(PrintProperties)
}

pub fn catalog() -> EntryPointCatalog {
    EntryPointCatalog::new()
        .bind(NOOP, noop)
        .bind(PRINT_PROPERTIES, print_properties)
}

/// In-memory type units backing the built-in entry points.
pub fn units() -> MemoryScheme {
    [NOOP, PRINT_PROPERTIES]
        .into_iter()
        .fold(MemoryScheme::new(), |scheme, name| {
            scheme.with(&type_unit_path(name), name.as_bytes().to_vec())
        })
}
