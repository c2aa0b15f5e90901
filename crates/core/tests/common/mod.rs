#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

/// Zip the given entries into memory.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Write a package archive to disk.
pub fn write_package(path: &Path, entries: &[(&str, &[u8])]) {
    let mut file = File::create(path).unwrap();
    file.write_all(&zip_bytes(entries)).unwrap();
}
